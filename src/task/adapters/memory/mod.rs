//! In-memory adapters for fixture mode.

mod task;

pub use task::InMemoryTaskGateway;
