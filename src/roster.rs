//! Compiled-in default conversation tables.
//!
//! The surrounding application normally loads these from a JSON file via
//! [`EngineConfig::from_json_str`]; this module is the shipped default and
//! the reference shape for that file.

use crate::config::EngineConfig;
use crate::model::{Agent, IdleEntry, ReactionRule, TriggerRule};

pub struct AgentDef {
    pub handle: &'static str,
    pub affiliation: &'static str,
    pub personality: &'static str,
    /// Response latency range in milliseconds, half-open.
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

pub const AGENTS: &[AgentDef] = &[
    AgentDef { handle: "rei", affiliation: "observatory", personality: "terse analyst", min_delay_ms: 900, max_delay_ms: 2200 },
    AgentDef { handle: "kuroba", affiliation: "field team", personality: "impulsive scout", min_delay_ms: 600, max_delay_ms: 1500 },
    AgentDef { handle: "dr_aoki", affiliation: "research wing", personality: "methodical scientist", min_delay_ms: 1400, max_delay_ms: 3200 },
    AgentDef { handle: "mippi", affiliation: "mascot", personality: "cheerful mascot", min_delay_ms: 500, max_delay_ms: 1200 },
    AgentDef { handle: "shion", affiliation: "command", personality: "calm commander", min_delay_ms: 1100, max_delay_ms: 2600 },
    AgentDef { handle: "old_tatsumi", affiliation: "archive", personality: "rambling archivist", min_delay_ms: 1800, max_delay_ms: 4000 },
];

pub struct TriggerDef {
    /// Matched as lower-cased substrings, in declaration order.
    pub keywords: &'static [&'static str],
    pub agent: &'static str,
    pub pool: &'static [&'static str],
}

/// Priority-ordered: the first rule with a matching keyword wins, so the
/// most specific rules come first. Keywords must not overlap between rules
/// (validation enforces this unless explicitly acknowledged).
pub const TRIGGERS: &[TriggerDef] = &[
    TriggerDef {
        keywords: &["異常", "アノマリー", "anomaly"],
        agent: "rei",
        pool: &[
            "観測班より報告。数値が揺れています。",
            "……確認しました。異常です。",
            "計器の読みを再送します。少し待ってください。",
        ],
    },
    TriggerDef {
        keywords: &["警報", "アラート", "alert"],
        agent: "shion",
        pool: &["全員、持ち場へ。", "状況を報告しろ。", "落ち着け。手順どおりに動け。"],
    },
    TriggerDef {
        keywords: &["調査", "探索", "現場"],
        agent: "kuroba",
        pool: &["現場はオレが見てくる!", "先に行ってるぞ。", "装備は任せろ。すぐ出る。"],
    },
    TriggerDef {
        keywords: &["研究", "解析", "サンプル"],
        agent: "dr_aoki",
        pool: &["解析には半日かかる。急かすな。", "サンプルはこちらで預かろう。", "興味深い。実に興味深い。"],
    },
    TriggerDef {
        keywords: &["記録", "昔", "歴史"],
        agent: "old_tatsumi",
        pool: &["ふむ、昔も似たことがあってな……。", "書庫の三列目、あの棚じゃよ。"],
    },
    TriggerDef {
        keywords: &["こんにちは", "おはよう", "hello"],
        agent: "mippi",
        pool: &["こんにちはなのだ〜", "やっほー!元気?", "みっぴーだよ!"],
    },
];

/// Fixed rotation order for fallback chatter.
pub const IDLE_POOL: &[(&str, &str)] = &[
    ("mippi", "おやつの時間はまだかなあ"),
    ("kuroba", "体がなまってきたな……"),
    ("rei", "定時観測、異常なし。"),
    ("dr_aoki", "興味深いサンプルが届いた。"),
    ("shion", "各員、油断するな。"),
    ("old_tatsumi", "最近の若いもんは記録を読まん。"),
];

pub struct ReactionDef {
    pub source: &'static str,
    pub reactor: &'static str,
    pub probability: f64,
    pub pool: &'static [&'static str],
}

pub const REACTIONS: &[ReactionDef] = &[
    ReactionDef { source: "rei", reactor: "kuroba", probability: 0.6, pool: &["マジか、見てくる!", "どの区画だ?"] },
    ReactionDef { source: "rei", reactor: "dr_aoki", probability: 0.45, pool: &["数値を転送してくれ。", "ふむ、予想どおりか。"] },
    ReactionDef { source: "shion", reactor: "rei", probability: 0.5, pool: &["観測班、了解。", "待機します。"] },
    ReactionDef { source: "shion", reactor: "kuroba", probability: 0.4, pool: &["了解!すぐ動く!"] },
    ReactionDef { source: "kuroba", reactor: "mippi", probability: 0.35, pool: &["きをつけてね〜", "おみやげよろしく!"] },
    ReactionDef { source: "dr_aoki", reactor: "rei", probability: 0.4, pool: &["解析結果を共有します。"] },
    ReactionDef { source: "mippi", reactor: "kuroba", probability: 0.35, pool: &["はいはい、付き合うよ。"] },
];

/// Materialize the static tables into an owned, unvalidated config.
/// Run it through [`EngineConfig::validated`] or `Engine::new` as usual.
pub fn default_config() -> EngineConfig {
    EngineConfig {
        agents: AGENTS
            .iter()
            .enumerate()
            .map(|(i, def)| Agent {
                id: i as u64 + 1,
                handle: def.handle.to_string(),
                affiliation: def.affiliation.to_string(),
                personality: def.personality.to_string(),
                min_delay_ms: def.min_delay_ms,
                max_delay_ms: def.max_delay_ms,
            })
            .collect(),
        trigger_rules: TRIGGERS
            .iter()
            .map(|def| TriggerRule {
                keywords: def.keywords.iter().map(|s| s.to_string()).collect(),
                agent: def.agent.to_string(),
                pool: def.pool.iter().map(|s| s.to_string()).collect(),
            })
            .collect(),
        idle_pool: IDLE_POOL
            .iter()
            .map(|(agent, text)| IdleEntry {
                agent: agent.to_string(),
                text: text.to_string(),
            })
            .collect(),
        reaction_rules: REACTIONS
            .iter()
            .map(|def| ReactionRule {
                source: def.source.to_string(),
                reactor: def.reactor.to_string(),
                probability: def.probability,
                pool: def.pool.iter().map(|s| s.to_string()).collect(),
            })
            .collect(),
        allow_keyword_overlap: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_validate() {
        assert!(default_config().validated().is_ok());
    }

    #[test]
    fn every_agent_has_an_idle_line() {
        // The cascade wildcard looks idle lines up by handle; shipping a
        // roster where some agent has none would silently thin wildcards.
        for def in AGENTS {
            assert!(
                IDLE_POOL.iter().any(|(agent, _)| *agent == def.handle),
                "agent {} has no idle line",
                def.handle
            );
        }
    }

    #[test]
    fn all_pools_non_empty() {
        for def in TRIGGERS {
            assert!(!def.pool.is_empty(), "empty pool for {}", def.agent);
        }
        for def in REACTIONS {
            assert!(!def.pool.is_empty(), "empty pool for {}", def.source);
        }
    }
}
