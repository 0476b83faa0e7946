mod cascade;
mod idle;
mod matcher;
mod pool;

use rand::{Rng, RngCore};

pub use cascade::{WILDCARD_PROBABILITY, build_cascade, reaction_delay};
pub use idle::next_idle;
pub use matcher::match_rule;
pub use pool::pick;

use crate::config::{ConfigError, EngineConfig};
use crate::model::{EngineOutcome, PlanEntry};

/// Chance that an unmatched message still draws an idle line.
pub const IDLE_PROBABILITY_SINGLE: f64 = 0.5;
pub const IDLE_PROBABILITY_GROUP: f64 = 0.4;

/// Idle-path secondaries in group mode fire at half their normal chance
/// and trail the chatter by a fixed pad.
const IDLE_REACTION_DAMP: f64 = 0.5;
const IDLE_REACTION_PAD_MS: u64 = 2000;

/// The conversation engine. Holds validated, immutable configuration;
/// every call is a pure synchronous computation over the caller's text,
/// idle cursor, and injected RNG. No internal state, threads, or I/O —
/// the returned plan's `delay_ms` values are advisory for the caller's
/// delivery scheduler.
///
/// The per-conversation idle cursor is owned by the caller (persisted with
/// the conversation) and passed in by value; concurrent calls for the same
/// conversation must be serialized by the caller or the cursor's
/// read-modify-write will race. Different conversations are independent.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Validate the tables and build an engine. Fail-fast: a config that
    /// references unknown agents or carries an empty pool never constructs.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            config: config.validated()?,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether `handle` names a registered agent. Messages authored by
    /// registered agents must not be fed back into the engine, or it will
    /// happily trigger on its own NPCs' text.
    pub fn is_agent(&self, handle: &str) -> bool {
        self.config.agent(handle).is_some()
    }

    /// Single-responder mode: at most one agent answers.
    ///
    /// A matched trigger answers with a line from its pool and a delay
    /// drawn from the agent's own range, cursor untouched. Unmatched text
    /// consumes an idle line with probability [`IDLE_PROBABILITY_SINGLE`];
    /// otherwise the plan is empty (genuine silence, never a sentinel).
    pub fn respond(&self, text: &str, cursor: u64, rng: &mut dyn RngCore) -> EngineOutcome {
        if let Some(rule) = match_rule(&self.config.trigger_rules, text) {
            // Validated at load: the rule's agent exists.
            let Some(agent) = self.config.agent(&rule.agent) else {
                return EngineOutcome::silence(cursor);
            };
            let entry = PlanEntry {
                handle: agent.handle.clone(),
                text: pick(&rule.pool, rng).to_string(),
                delay_ms: agent.draw_delay(rng),
            };
            tracing::debug!(agent = %entry.handle, delay_ms = entry.delay_ms, "trigger matched");
            return EngineOutcome {
                plan: vec![entry],
                cursor,
                triggered: true,
            };
        }

        if rng.random_range(0.0..1.0) < IDLE_PROBABILITY_SINGLE
            && let Some((entry, next_cursor)) = next_idle(&self.config.idle_pool, cursor)
            && let Some(agent) = self.config.agent(&entry.agent)
        {
            let entry = PlanEntry {
                handle: agent.handle.clone(),
                text: entry.text.clone(),
                delay_ms: agent.draw_delay(rng),
            };
            tracing::debug!(agent = %entry.handle, cursor = next_cursor, "idle chatter");
            return EngineOutcome {
                plan: vec![entry],
                cursor: next_cursor,
                triggered: false,
            };
        }

        EngineOutcome::silence(cursor)
    }

    /// Group-cascade mode: a matched trigger can pull other agents in.
    ///
    /// The primary entry is built exactly as in [`respond`], then every
    /// reaction rule sourced at the primary rolls independently and a rare
    /// wildcard may interject (see [`build_cascade`]). Unmatched text
    /// consumes an idle line with probability [`IDLE_PROBABILITY_GROUP`];
    /// reaction rules sourced at the idle speaker then roll at half their
    /// normal probability with a `draw + 2000` delay. The returned plan is
    /// always sorted non-decreasing by `delay_ms`.
    pub fn respond_group(&self, text: &str, cursor: u64, rng: &mut dyn RngCore) -> EngineOutcome {
        if let Some(rule) = match_rule(&self.config.trigger_rules, text) {
            let Some(agent) = self.config.agent(&rule.agent) else {
                return EngineOutcome::silence(cursor);
            };
            let text = pick(&rule.pool, rng).to_string();
            let d0 = agent.draw_delay(rng);
            let mut plan = vec![PlanEntry {
                handle: agent.handle.clone(),
                text,
                delay_ms: d0,
            }];
            plan.extend(build_cascade(&self.config, agent, d0, rng));
            plan.sort_by_key(|e| e.delay_ms);
            tracing::debug!(primary = %agent.handle, entries = plan.len(), "cascade planned");
            return EngineOutcome {
                plan,
                cursor,
                triggered: true,
            };
        }

        if rng.random_range(0.0..1.0) < IDLE_PROBABILITY_GROUP
            && let Some((entry, next_cursor)) = next_idle(&self.config.idle_pool, cursor)
            && let Some(agent) = self.config.agent(&entry.agent)
        {
            let mut plan = vec![PlanEntry {
                handle: agent.handle.clone(),
                text: entry.text.clone(),
                delay_ms: agent.draw_delay(rng),
            }];
            for rule in &self.config.reaction_rules {
                if rule.source != agent.handle {
                    continue;
                }
                if rng.random_range(0.0..1.0) >= rule.probability * IDLE_REACTION_DAMP {
                    continue;
                }
                let Some(reactor) = self.config.agent(&rule.reactor) else {
                    continue;
                };
                plan.push(PlanEntry {
                    handle: reactor.handle.clone(),
                    text: pick(&rule.pool, rng).to_string(),
                    delay_ms: reactor.draw_delay(rng) + IDLE_REACTION_PAD_MS,
                });
            }
            plan.sort_by_key(|e| e.delay_ms);
            return EngineOutcome {
                plan,
                cursor: next_cursor,
                triggered: false,
            };
        }

        EngineOutcome::silence(cursor)
    }

    /// Boundary-guarded [`respond`]: returns `None` when `sender` is a
    /// registered agent (the message is the engine's own output echoing
    /// back) so a careless caller cannot build a self-triggering loop.
    pub fn respond_from(
        &self,
        sender: &str,
        text: &str,
        cursor: u64,
        rng: &mut dyn RngCore,
    ) -> Option<EngineOutcome> {
        if self.is_agent(sender) {
            tracing::debug!(sender, "ignoring agent-authored message");
            return None;
        }
        Some(self.respond(text, cursor, rng))
    }

    /// Boundary-guarded [`respond_group`]; see [`respond_from`].
    pub fn respond_group_from(
        &self,
        sender: &str,
        text: &str,
        cursor: u64,
        rng: &mut dyn RngCore,
    ) -> Option<EngineOutcome> {
        if self.is_agent(sender) {
            tracing::debug!(sender, "ignoring agent-authored message");
            return None;
        }
        Some(self.respond_group(text, cursor, rng))
    }
}
