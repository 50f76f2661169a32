//! Wallet and ledger ports used to lock bounty funds in escrow.

use crate::task::domain::{Amount, TxId, WalletAddress};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Note attached to escrow deposit payments.
pub const ESCROW_DEPOSIT_NOTE: &str = "GigBounty Escrow Deposit";

/// Unsigned payment from a creator to the escrow account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentTransaction {
    /// Paying wallet.
    pub sender: WalletAddress,
    /// Escrow account.
    pub receiver: WalletAddress,
    /// Amount transferred.
    pub amount: Amount,
    /// Free-text note recorded on the ledger.
    pub note: String,
}

impl PaymentTransaction {
    /// Builds an escrow deposit payment.
    #[must_use]
    pub fn escrow_deposit(sender: WalletAddress, escrow: WalletAddress, amount: Amount) -> Self {
        Self {
            sender,
            receiver: escrow,
            amount,
            note: ESCROW_DEPOSIT_NOTE.to_owned(),
        }
    }
}

/// Signed transaction bytes ready for ledger submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction(Vec<u8>);

impl SignedTransaction {
    /// Wraps signed transaction bytes.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// External wallet that owns the user's keys.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Asks the user to connect a wallet and returns its address.
    async fn connect(&self) -> Result<WalletAddress, WalletError>;

    /// Asks the user to sign a payment.
    async fn sign(&self, payment: &PaymentTransaction) -> Result<SignedTransaction, WalletError>;
}

/// Errors reported by the wallet.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    /// The user closed the wallet prompt or declined.
    #[error("request cancelled by the user")]
    Cancelled,

    /// No wallet is reachable.
    #[error("wallet unavailable: {0}")]
    Unavailable(String),

    /// The wallet refused to sign.
    #[error("wallet rejected the request: {0}")]
    Rejected(String),
}

/// Public ledger accepting signed payments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Submits a signed transaction and waits for confirmation.
    async fn submit(&self, signed: &SignedTransaction) -> Result<TxId, LedgerError>;

    /// Reads the spendable balance of `address`.
    async fn balance(&self, address: &WalletAddress) -> Result<Amount, LedgerError>;
}

/// Errors reported by ledger implementations.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// The ledger rejected the request.
    #[error("ledger rejected the request with status {status}: {detail}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Ledger-provided explanation.
        detail: String,
    },

    /// The transaction was not confirmed within the polling window.
    #[error("transaction {tx_id} not confirmed after {polls} polls")]
    NotConfirmed {
        /// Submitted transaction.
        tx_id: TxId,
        /// Number of status polls made.
        polls: u32,
    },

    /// The response could not be decoded.
    #[error("malformed ledger response: {0}")]
    Decode(String),

    /// The ledger could not be reached.
    #[error("ledger transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl LedgerError {
    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
