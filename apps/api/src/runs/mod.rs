// Optimization runs: background execution, in-memory tracking and the HTTP handlers.

pub mod executor;
pub mod handlers;
pub mod store;

pub use store::RunStore;
