use crate::model::IdleEntry;

/// Take the next idle line for a conversation.
///
/// Deterministic round-robin: returns `pool[cursor % len]` and `cursor + 1`.
/// Randomness only governs whether an idle pick happens at all (the facade's
/// roll), never which entry, so chatter visibly rotates without fast
/// repetition. Returns `None` for an empty pool.
pub fn next_idle(pool: &[IdleEntry], cursor: u64) -> Option<(&IdleEntry, u64)> {
    if pool.is_empty() {
        return None;
    }
    let entry = &pool[(cursor % pool.len() as u64) as usize];
    Some((entry, cursor + 1))
}
