mod agent;
mod plan;
mod rule;

pub use agent::Agent;
pub use plan::{EngineOutcome, PlanEntry};
pub use rule::{IdleEntry, ReactionRule, TriggerRule};
