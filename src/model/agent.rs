use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// One NPC identity. Immutable after load; looked up by `handle`.
///
/// The handle doubles as the chat sender identity, which is why the caller
/// (or the `respond_from` guard) must never feed an agent-authored message
/// back into the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: u64,
    pub handle: String,
    pub affiliation: String,
    /// Flavor only; never consulted by the engine.
    pub personality: String,
    /// Response latency range in milliseconds, half-open `[min, max)`.
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Agent {
    /// Draw a response delay uniformly from this agent's `[min, max)` range.
    pub fn draw_delay(&self, rng: &mut dyn RngCore) -> u64 {
        if self.min_delay_ms >= self.max_delay_ms {
            return self.min_delay_ms;
        }
        rng.random_range(self.min_delay_ms..self.max_delay_ms)
    }
}
