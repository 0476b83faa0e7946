use convo_engine::engine::IDLE_PROBABILITY_SINGLE;
use convo_engine::testutil::{MaxRng, ZeroRng};
use convo_engine::{Engine, roster};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn engine() -> Engine {
    Engine::new(roster::default_config()).unwrap()
}

#[test]
fn anomaly_report_answered_by_rei() {
    let engine = engine();
    let mut rng = SmallRng::seed_from_u64(42);
    let out = engine.respond("異常を検知した", 0, &mut rng);

    assert!(out.triggered);
    assert_eq!(out.cursor, 0, "trigger must not consume the idle cursor");
    assert_eq!(out.plan.len(), 1);

    let entry = &out.plan[0];
    assert_eq!(entry.handle, "rei");
    let rule = &engine.config().trigger_rules[0];
    assert!(rule.pool.contains(&entry.text), "text must come from the rule's pool");
    let agent = engine.config().agent("rei").unwrap();
    assert!(
        (agent.min_delay_ms..agent.max_delay_ms).contains(&entry.delay_ms),
        "delay {} outside rei's configured range",
        entry.delay_ms
    );
}

#[test]
fn earlier_priority_rule_shadows_later() {
    let engine = engine();
    // "異常" belongs to the first rule, "調査" to a later one.
    for seed in 0..20 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let out = engine.respond("異常だ、調査を頼む", 0, &mut rng);
        assert!(out.triggered);
        assert_eq!(out.plan[0].handle, "rei", "seed {seed}: later rule responded");
    }
}

#[test]
fn unmatched_with_failed_roll_is_empty_silence() {
    let engine = engine();
    let mut rng = MaxRng;
    let out = engine.respond("zzz", 3, &mut rng);
    assert_eq!(out.plan.len(), 0);
    assert!(!out.triggered);
    assert_eq!(out.cursor, 3);
}

#[test]
fn idle_rotation_walks_the_pool_in_order() {
    let engine = engine();
    let pool_len = engine.config().idle_pool.len() as u64;
    let mut cursor = 0;
    let mut texts = Vec::new();
    // ZeroRng forces every idle roll to succeed.
    for _ in 0..pool_len {
        let out = engine.respond("zzz", cursor, &mut ZeroRng);
        assert!(!out.triggered);
        assert_eq!(out.plan.len(), 1);
        cursor = out.cursor;
        texts.push(out.plan[0].text.clone());
    }
    assert_eq!(cursor, pool_len);

    let expected: Vec<String> = engine
        .config()
        .idle_pool
        .iter()
        .map(|e| e.text.clone())
        .collect();
    assert_eq!(texts, expected, "idle chatter must rotate, not repeat");

    // Wrap-around: the next pick is the first entry again.
    let out = engine.respond("zzz", cursor, &mut ZeroRng);
    assert_eq!(out.plan[0].text, expected[0]);
}

#[test]
fn same_seed_same_plan() {
    let engine = engine();
    let mut a = SmallRng::seed_from_u64(7);
    let mut b = SmallRng::seed_from_u64(7);
    let out_a = engine.respond("異常を検知した", 5, &mut a);
    let out_b = engine.respond("異常を検知した", 5, &mut b);
    assert_eq!(out_a, out_b);
}

#[test]
fn idle_frequency_converges_to_configured_probability() {
    let engine = engine();
    let mut rng = SmallRng::seed_from_u64(2024);
    let trials = 10_000;
    let mut cursor = 0;
    let mut replies = 0u32;
    for _ in 0..trials {
        let out = engine.respond("zzz", cursor, &mut rng);
        cursor = out.cursor;
        if !out.plan.is_empty() {
            replies += 1;
        }
    }
    let fraction = f64::from(replies) / f64::from(trials);
    assert!(
        (fraction - IDLE_PROBABILITY_SINGLE).abs() < 0.02,
        "idle reply fraction {fraction} strayed from {IDLE_PROBABILITY_SINGLE}"
    );
}
