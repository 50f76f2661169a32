//! Task lifecycle for the bounty board.
//!
//! Tasks move OPEN → CLAIMED → SUBMITTED → COMPLETED, with CANCELLED,
//! DISPUTED, and EXPIRED as side exits. The remote task service is the
//! authority; the client evaluates the same guards up front so it can
//! reject bad requests early and decide which controls to enable.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Board services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
