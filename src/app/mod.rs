//! Application layer - cycle scheduling and startup wiring.

mod cycle;
mod scheduler;

#[cfg(feature = "onchain")]
pub mod bootstrap;

pub use cycle::{CycleOutcome, CycleReport, CycleStage, SkipReason};
pub use scheduler::{CycleScheduler, Pipeline};
