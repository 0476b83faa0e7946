use serde::{Deserialize, Serialize};

/// One priority-ordered trigger: if any keyword is a substring of the
/// (lower-cased) inbound text, `agent` answers with a line from `pool`.
///
/// Rules live in a fixed ordered list and the first match wins; declaration
/// order is the documented tie-break for overlapping keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerRule {
    /// Lower-cased at load; matched by substring containment.
    pub keywords: Vec<String>,
    pub agent: String,
    pub pool: Vec<String>,
}

/// Probabilistic edge from one agent's triggered response to another
/// agent's secondary reaction. All rules sharing a source roll independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionRule {
    pub source: String,
    pub reactor: String,
    /// Chance in `[0, 1]` that the reactor chimes in.
    pub probability: f64,
    pub pool: Vec<String>,
}

/// Fixed idle-chatter line for one agent, consumed round-robin per
/// conversation so fallback chatter varies without fast repetition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdleEntry {
    pub agent: String,
    pub text: String,
}
