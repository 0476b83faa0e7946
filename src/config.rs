use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Agent, IdleEntry, ReactionRule, TriggerRule};

/// Errors found while validating the conversation tables.
///
/// All of these are fatal at load time: the process should refuse to start
/// with a broken roster rather than fail per message.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duplicate agent handle {handle:?}")]
    DuplicateHandle { handle: String },

    #[error("agent {handle:?} has inverted delay range {min}..{max}")]
    InvertedDelayRange { handle: String, min: u64, max: u64 },

    #[error("{table} references unknown agent {handle:?}")]
    UnknownAgent { table: &'static str, handle: String },

    #[error("trigger rule {index} ({agent}) has an empty response pool")]
    EmptyTriggerPool { index: usize, agent: String },

    #[error("trigger rule {index} ({agent}) has no keywords")]
    NoKeywords { index: usize, agent: String },

    #[error("trigger rule {index} ({agent}) has a blank keyword")]
    BlankKeyword { index: usize, agent: String },

    // Field is not named `source`: thiserror reserves that name for the
    // error's cause.
    #[error("reaction rule {source_agent} -> {reactor} has an empty pool")]
    EmptyReactionPool {
        source_agent: String,
        reactor: String,
    },

    #[error("reaction rule {source_agent} -> {reactor} has probability {value} outside [0, 1]")]
    BadProbability {
        source_agent: String,
        reactor: String,
        value: f64,
    },

    #[error(
        "keyword {keyword:?} appears in trigger rules {first} and {second}; \
         set allow_keyword_overlap to acknowledge priority order"
    )]
    KeywordOverlap {
        keyword: String,
        first: usize,
        second: usize,
    },

    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The engine's full configuration surface: agent registry, priority-ordered
/// trigger rules, the fixed idle pool, and reaction rules. Loaded once at
/// process start; there is no runtime mutation API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub agents: Vec<Agent>,
    /// Order is part of the contract: the first matching rule wins.
    pub trigger_rules: Vec<TriggerRule>,
    /// Fixed order; consumed round-robin via the per-conversation cursor.
    pub idle_pool: Vec<IdleEntry>,
    pub reaction_rules: Vec<ReactionRule>,
    /// Overlapping keywords between rules are a load error unless the
    /// author acknowledges that declaration order resolves them.
    #[serde(default)]
    pub allow_keyword_overlap: bool,
}

impl EngineConfig {
    /// Parse and validate a JSON config (the shape `to_json_string` writes).
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(s)?;
        config.validated()
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Normalize keywords to lowercase and check every invariant the engine
    /// relies on at call time. Consumes and returns the config so an
    /// unvalidated one never reaches an [`Engine`](crate::Engine).
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        for rule in &mut self.trigger_rules {
            for kw in &mut rule.keywords {
                *kw = kw.to_lowercase();
            }
        }
        self.validate()?;
        Ok(self)
    }

    pub fn agent(&self, handle: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.handle == handle)
    }

    /// First idle-pool line belonging to `handle`, if any.
    pub fn idle_entry_for(&self, handle: &str) -> Option<&IdleEntry> {
        self.idle_pool.iter().find(|e| e.agent == handle)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (i, agent) in self.agents.iter().enumerate() {
            if self.agents[..i].iter().any(|a| a.handle == agent.handle) {
                return Err(ConfigError::DuplicateHandle {
                    handle: agent.handle.clone(),
                });
            }
            if agent.min_delay_ms > agent.max_delay_ms {
                return Err(ConfigError::InvertedDelayRange {
                    handle: agent.handle.clone(),
                    min: agent.min_delay_ms,
                    max: agent.max_delay_ms,
                });
            }
        }

        for (index, rule) in self.trigger_rules.iter().enumerate() {
            if self.agent(&rule.agent).is_none() {
                return Err(ConfigError::UnknownAgent {
                    table: "trigger rule",
                    handle: rule.agent.clone(),
                });
            }
            if rule.pool.is_empty() {
                return Err(ConfigError::EmptyTriggerPool {
                    index,
                    agent: rule.agent.clone(),
                });
            }
            if rule.keywords.is_empty() {
                return Err(ConfigError::NoKeywords {
                    index,
                    agent: rule.agent.clone(),
                });
            }
            if rule.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(ConfigError::BlankKeyword {
                    index,
                    agent: rule.agent.clone(),
                });
            }
        }

        self.check_keyword_overlap()?;

        for entry in &self.idle_pool {
            if self.agent(&entry.agent).is_none() {
                return Err(ConfigError::UnknownAgent {
                    table: "idle pool",
                    handle: entry.agent.clone(),
                });
            }
        }

        for rule in &self.reaction_rules {
            for handle in [&rule.source, &rule.reactor] {
                if self.agent(handle).is_none() {
                    return Err(ConfigError::UnknownAgent {
                        table: "reaction rule",
                        handle: handle.clone(),
                    });
                }
            }
            if rule.pool.is_empty() {
                return Err(ConfigError::EmptyReactionPool {
                    source_agent: rule.source.clone(),
                    reactor: rule.reactor.clone(),
                });
            }
            if !(0.0..=1.0).contains(&rule.probability) {
                return Err(ConfigError::BadProbability {
                    source_agent: rule.source.clone(),
                    reactor: rule.reactor.clone(),
                    value: rule.probability,
                });
            }
        }

        Ok(())
    }

    /// Keyword overlap between two rules silently resolves to the earlier
    /// rule, which is easy to introduce by accident when rules grow.
    fn check_keyword_overlap(&self) -> Result<(), ConfigError> {
        for (second, rule) in self.trigger_rules.iter().enumerate() {
            for kw in &rule.keywords {
                let earlier = self.trigger_rules[..second]
                    .iter()
                    .position(|r| r.keywords.contains(kw));
                if let Some(first) = earlier {
                    if self.allow_keyword_overlap {
                        tracing::warn!(
                            keyword = %kw,
                            first,
                            second,
                            "trigger keyword overlap resolved by priority order"
                        );
                    } else {
                        return Err(ConfigError::KeywordOverlap {
                            keyword: kw.clone(),
                            first,
                            second,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{self, ConfigBuilder};

    #[test]
    fn valid_config_passes() {
        assert!(testutil::small_config().validated().is_ok());
    }

    #[test]
    fn unknown_trigger_agent_rejected() {
        let config = ConfigBuilder::new()
            .agent("rei", 900, 2200)
            .trigger("ghost", &["異常"], &["..."])
            .build();
        let err = config.validated().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownAgent { table: "trigger rule", .. }
        ));
    }

    #[test]
    fn empty_response_pool_rejected() {
        let config = ConfigBuilder::new()
            .agent("rei", 900, 2200)
            .trigger("rei", &["異常"], &[])
            .build();
        let err = config.validated().unwrap_err();
        assert!(matches!(err, ConfigError::EmptyTriggerPool { index: 0, .. }));
    }

    #[test]
    fn empty_reaction_pool_rejected() {
        let config = ConfigBuilder::new()
            .agent("rei", 900, 2200)
            .agent("kuroba", 600, 1500)
            .reaction("rei", "kuroba", 0.5, &[])
            .build();
        let err = config.validated().unwrap_err();
        assert!(matches!(err, ConfigError::EmptyReactionPool { .. }));
    }

    #[test]
    fn keywordless_trigger_rejected() {
        let config = ConfigBuilder::new()
            .agent("rei", 900, 2200)
            .trigger("rei", &[], &["..."])
            .build();
        let err = config.validated().unwrap_err();
        assert!(matches!(err, ConfigError::NoKeywords { index: 0, .. }));
    }

    #[test]
    fn blank_keyword_rejected() {
        let config = ConfigBuilder::new()
            .agent("rei", 900, 2200)
            .trigger("rei", &["  "], &["..."])
            .build();
        let err = config.validated().unwrap_err();
        assert!(matches!(err, ConfigError::BlankKeyword { .. }));
    }

    #[test]
    fn duplicate_handle_rejected() {
        let config = ConfigBuilder::new()
            .agent("rei", 900, 2200)
            .agent("rei", 600, 1500)
            .build();
        let err = config.validated().unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateHandle { .. }));
    }

    #[test]
    fn inverted_delay_range_rejected() {
        let config = ConfigBuilder::new().agent("rei", 2200, 900).build();
        let err = config.validated().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvertedDelayRange { min: 2200, max: 900, .. }
        ));
    }

    #[test]
    fn reaction_probability_out_of_range_rejected() {
        let config = ConfigBuilder::new()
            .agent("rei", 900, 2200)
            .agent("kuroba", 600, 1500)
            .reaction("rei", "kuroba", 1.5, &["!"])
            .build();
        let err = config.validated().unwrap_err();
        assert!(matches!(err, ConfigError::BadProbability { .. }));
    }

    #[test]
    fn keyword_overlap_rejected_without_acknowledgement() {
        let config = ConfigBuilder::new()
            .agent("rei", 900, 2200)
            .agent("kuroba", 600, 1500)
            .trigger("rei", &["異常"], &["a"])
            .trigger("kuroba", &["異常", "調査"], &["b"])
            .build();
        let err = config.validated().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::KeywordOverlap { first: 0, second: 1, .. }
        ));
    }

    #[test]
    fn keyword_overlap_allowed_when_acknowledged() {
        let mut config = ConfigBuilder::new()
            .agent("rei", 900, 2200)
            .agent("kuroba", 600, 1500)
            .trigger("rei", &["異常"], &["a"])
            .trigger("kuroba", &["異常"], &["b"])
            .build();
        config.allow_keyword_overlap = true;
        assert!(config.validated().is_ok());
    }

    #[test]
    fn keywords_lowercased_on_validation() {
        let config = ConfigBuilder::new()
            .agent("rei", 900, 2200)
            .trigger("rei", &["Anomaly"], &["..."])
            .build();
        let config = config.validated().unwrap();
        assert_eq!(config.trigger_rules[0].keywords, vec!["anomaly"]);
    }

    #[test]
    fn json_round_trip() {
        let config = testutil::small_config().validated().unwrap();
        let json = config.to_json_string().unwrap();
        let reloaded = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(config, reloaded);
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let err = EngineConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
