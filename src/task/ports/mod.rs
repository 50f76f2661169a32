//! Port contracts for the task lifecycle.
//!
//! Ports define transport-agnostic interfaces used by task services.

pub mod gateway;
pub mod wallet;

pub use gateway::{
    CreateTaskCommand, GatewayMode, TaskGateway, TaskGatewayError, TaskGatewayResult,
};
pub use wallet::{
    ESCROW_DEPOSIT_NOTE, Ledger, LedgerError, PaymentTransaction, SignedTransaction, WalletError,
    WalletProvider,
};
