pub mod config;
pub mod engine;
pub mod model;
pub mod roster;
pub mod testutil;

pub use config::{ConfigError, EngineConfig};
pub use engine::Engine;
pub use model::{Agent, EngineOutcome, IdleEntry, PlanEntry, ReactionRule, TriggerRule};
