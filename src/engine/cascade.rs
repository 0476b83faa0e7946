use rand::{Rng, RngCore};

use super::pool;
use crate::config::EngineConfig;
use crate::model::{Agent, PlanEntry};

/// Chance that one unrelated agent drops its idle line into a cascade.
pub const WILDCARD_PROBABILITY: f64 = 0.2;
const WILDCARD_BASE_MS: u64 = 3000;
const WILDCARD_JITTER_MS: u64 = 2000;

/// Secondary reactions are compressed relative to a fresh reply but always
/// land a beat after the primary.
const REACTION_SCALE: f64 = 0.6;
const REACTION_GAP_MS: u64 = 800;

/// Delay for a secondary reaction: the reactor's own draw, scaled, anchored
/// strictly after the primary's delay `d0`.
pub fn reaction_delay(d0: u64, reactor_draw: u64) -> u64 {
    d0 + (reactor_draw as f64 * REACTION_SCALE) as u64 + REACTION_GAP_MS
}

/// Build the secondary portion of a group cascade for a triggered primary.
///
/// Every reaction rule sourced at the primary rolls independently; each
/// success schedules the reactor at [`reaction_delay`]. Independently of
/// those rolls, with [`WILDCARD_PROBABILITY`] one uniformly random agent
/// other than the primary interjects its idle line at
/// `d0 + 3000 + uniform[0, 2000)` — at most once per cascade, and silently
/// omitted when the chosen agent has no idle line.
pub fn build_cascade(
    config: &EngineConfig,
    primary: &Agent,
    d0: u64,
    rng: &mut dyn RngCore,
) -> Vec<PlanEntry> {
    let mut entries = Vec::new();

    for rule in &config.reaction_rules {
        if rule.source != primary.handle {
            continue;
        }
        if rng.random_range(0.0..1.0) >= rule.probability {
            continue;
        }
        // Validated at load: reactor exists and the pool is non-empty.
        let Some(reactor) = config.agent(&rule.reactor) else {
            continue;
        };
        let text = pool::pick(&rule.pool, rng).to_string();
        let delay_ms = reaction_delay(d0, reactor.draw_delay(rng));
        tracing::debug!(reactor = %reactor.handle, delay_ms, "reaction joined cascade");
        entries.push(PlanEntry {
            handle: reactor.handle.clone(),
            text,
            delay_ms,
        });
    }

    if rng.random_range(0.0..1.0) < WILDCARD_PROBABILITY {
        let others: Vec<&Agent> = config
            .agents
            .iter()
            .filter(|a| a.handle != primary.handle)
            .collect();
        if !others.is_empty() {
            let chosen = others[rng.random_range(0..others.len())];
            // No idle line for this agent means no wildcard at all.
            if let Some(entry) = config.idle_entry_for(&chosen.handle) {
                let delay_ms = d0 + WILDCARD_BASE_MS + rng.random_range(0..WILDCARD_JITTER_MS);
                tracing::debug!(agent = %chosen.handle, delay_ms, "wildcard interjection");
                entries.push(PlanEntry {
                    handle: chosen.handle.clone(),
                    text: entry.text.clone(),
                    delay_ms,
                });
            }
        }
    }

    entries
}
