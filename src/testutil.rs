//! Deterministic helpers for engine tests: a compact roster, a
//! builder-style config constructor, and RNGs forced to the extremes so
//! probabilistic branches can be pinned down.

use rand::RngCore;

use crate::config::EngineConfig;
use crate::model::{Agent, IdleEntry, ReactionRule, TriggerRule};

/// Shorthand agent with flavor fields filled in.
pub fn agent(handle: &str, min_delay_ms: u64, max_delay_ms: u64) -> Agent {
    Agent {
        id: 0,
        handle: handle.to_string(),
        affiliation: "test".to_string(),
        personality: "test".to_string(),
        min_delay_ms,
        max_delay_ms,
    }
}

/// Incremental [`EngineConfig`] constructor for tests that need a table
/// the compact roster doesn't cover.
pub struct ConfigBuilder {
    config: EngineConfig,
    next_id: u64,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig {
                agents: Vec::new(),
                trigger_rules: Vec::new(),
                idle_pool: Vec::new(),
                reaction_rules: Vec::new(),
                allow_keyword_overlap: false,
            },
            next_id: 1,
        }
    }

    pub fn agent(mut self, handle: &str, min_delay_ms: u64, max_delay_ms: u64) -> Self {
        let mut a = agent(handle, min_delay_ms, max_delay_ms);
        a.id = self.next_id;
        self.next_id += 1;
        self.config.agents.push(a);
        self
    }

    pub fn trigger(mut self, agent: &str, keywords: &[&str], pool: &[&str]) -> Self {
        self.config.trigger_rules.push(TriggerRule {
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            agent: agent.to_string(),
            pool: pool.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    pub fn idle(mut self, agent: &str, text: &str) -> Self {
        self.config.idle_pool.push(IdleEntry {
            agent: agent.to_string(),
            text: text.to_string(),
        });
        self
    }

    pub fn reaction(mut self, source: &str, reactor: &str, probability: f64, pool: &[&str]) -> Self {
        self.config.reaction_rules.push(ReactionRule {
            source: source.to_string(),
            reactor: reactor.to_string(),
            probability,
            pool: pool.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Unvalidated; run through `validated()` or `Engine::new` as the test
    /// requires.
    pub fn build(self) -> EngineConfig {
        self.config
    }
}

/// Five-agent roster exercising every table: the `rei` anomaly rule has two
/// sourced reactions, every agent has an idle line, and `mippi` (first idle
/// entry) sources a reaction so the group-mode idle path has something to
/// roll for.
pub fn small_config() -> EngineConfig {
    ConfigBuilder::new()
        .agent("rei", 900, 2200)
        .agent("kuroba", 600, 1500)
        .agent("dr_aoki", 1400, 3200)
        .agent("mippi", 500, 1200)
        .agent("shion", 1100, 2600)
        .trigger("rei", &["異常", "アノマリー", "anomaly"], &["観測班より報告。数値が揺れています。", "……確認しました。異常です。"])
        .trigger("shion", &["警報", "アラート", "alert"], &["全員、持ち場へ。", "状況を報告しろ。"])
        .trigger("kuroba", &["調査", "探索"], &["現場はオレが見てくる!", "先に行ってるぞ。"])
        .trigger("mippi", &["こんにちは", "hello"], &["こんにちはなのだ〜", "やっほー!"])
        .idle("mippi", "おやつの時間はまだかなあ")
        .idle("kuroba", "体がなまってきたな……")
        .idle("rei", "定時観測、異常なし。")
        .idle("dr_aoki", "興味深いサンプルが届いた。")
        .idle("shion", "各員、油断するな。")
        .reaction("rei", "kuroba", 0.6, &["マジか、見てくる!", "どの区画だ?"])
        .reaction("rei", "dr_aoki", 0.45, &["数値を転送してくれ。", "ふむ、予想どおりか。"])
        .reaction("shion", "rei", 0.5, &["観測班、了解。"])
        .reaction("mippi", "kuroba", 0.35, &["はいはい、付き合うよ。"])
        .build()
}

/// RNG pinned to the low end: every probability roll comes out 0.0 (the
/// word's low bits are discarded in float conversion) and every range draw
/// returns its lower bound, so gated branches always fire.
///
/// Emits 1 rather than 0 because uniform integer sampling rejects words
/// below its bias threshold, and a constant 0 would retry forever.
pub struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        1
    }
    fn next_u64(&mut self) -> u64 {
        1
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }
}

/// RNG pinned to all-one bits: probability rolls land just under 1.0 (so
/// any probability below one fails) and range draws return their upper end.
pub struct MaxRng;

impl RngCore for MaxRng {
    fn next_u32(&mut self) -> u32 {
        u32::MAX
    }
    fn next_u64(&mut self) -> u64 {
        u64::MAX
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0xff);
    }
}
