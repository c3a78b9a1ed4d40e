pub mod policy;
pub mod reports;
pub mod simulation;

pub use policy::GameplayStrategy;
pub use simulation::{MAX_TURNS_PER_DAY, RunRecord, StrategyAggregate, aggregate_runs, run_matrix};
