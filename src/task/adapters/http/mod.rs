//! HTTP adapters for the remote task service.

mod gateway;

pub use gateway::{HttpTaskGateway, WALLET_HEADER};
