//! Adapter implementations of the task ports.

pub mod algod;
pub mod fixture;
pub mod http;
pub mod memory;
pub(crate) mod wire;
