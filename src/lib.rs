//! GigBounty: client-side task board for an escrow-backed bounty market.
//!
//! Creators post tasks with a bounty locked in escrow, workers claim them
//! and submit proof, and creators approve to release payment. This crate
//! holds the client half: the lifecycle guards, a cached board kept in step
//! with the remote task service, and the wallet session passed to every
//! operation.
//!
//! # Architecture
//!
//! The task lifecycle follows hexagonal architecture principles:
//!
//! - **Domain**: lifecycle state machine, guards, and validated values
//! - **Ports**: task service, wallet, and ledger contracts
//! - **Adapters**: HTTP service client, algod ledger, in-memory fixture store
//! - **Services**: the task board, leaderboard, and escrow funding
//!
//! # Modules
//!
//! - [`task`]: task lifecycle domain, ports, adapters, and services
//! - [`session`]: wallet session and role hints
//! - [`config`]: environment configuration
//! - [`render`]: text views of the board
//! - [`telemetry`]: tracing set-up for binaries

pub mod config;
mod fs_utils;
pub mod render;
pub mod session;
pub mod task;
pub mod telemetry;
