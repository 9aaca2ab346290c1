//! Optimization core: the validation aggregator and the refinement loop that drives it.

pub mod aggregator;
pub mod refinement;

pub use aggregator::ExecutionMode;
pub use refinement::{run_optimization, LoopOptions, OptimizeError, MAX_ITERATIONS_LIMIT};
