use serde::{Deserialize, Serialize};

/// One scheduled message: which agent speaks, what it says, and how long
/// after the triggering message it should land.
///
/// `delay_ms` is a relative offset from the moment the triggering message
/// was received, not a wall-clock time. Acting on it (timers, delayed
/// sends, cancellation when the conversation dies) is the delivery layer's
/// job; the engine never waits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub handle: String,
    pub text: String,
    pub delay_ms: u64,
}

/// Result of one engine call.
///
/// `plan` is sorted non-decreasing by `delay_ms`; an empty plan means
/// genuine silence (never a sentinel agent with empty text). `cursor` is
/// the updated idle cursor the caller must persist — it only moves when an
/// idle pick was actually consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOutcome {
    pub plan: Vec<PlanEntry>,
    pub cursor: u64,
    pub triggered: bool,
}

impl EngineOutcome {
    pub fn silence(cursor: u64) -> Self {
        Self {
            plan: Vec::new(),
            cursor,
            triggered: false,
        }
    }
}
