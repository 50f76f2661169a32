//! Task posting requests and escrow funding.

use crate::task::{
    domain::{Amount, TxId, WalletAddress},
    ports::{Ledger, LedgerError, PaymentTransaction, WalletError, WalletProvider},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Raw form input for a new task.
///
/// Fields are kept as entered and validated together when posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTaskRequest {
    pub(super) title: String,
    pub(super) description: String,
    pub(super) amount: String,
    pub(super) deadline: Option<String>,
}

impl PostTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            amount: amount.into(),
            deadline: None,
        }
    }

    /// Sets the deadline, formatted `YYYY-MM-DD`.
    #[must_use]
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }
}

/// Failure while locking a bounty in escrow.
#[derive(Debug, Clone, Error)]
pub enum FundingError {
    /// The wallet did not sign.
    #[error(transparent)]
    Wallet(#[from] WalletError),
    /// The ledger did not accept or confirm the payment.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Wallet and ledger pair used to fund escrow deposits.
#[derive(Clone)]
pub struct EscrowFunding {
    wallet: Arc<dyn WalletProvider>,
    ledger: Arc<dyn Ledger>,
}

impl EscrowFunding {
    /// Creates a funding flow from a wallet and a ledger.
    #[must_use]
    pub fn new(wallet: Arc<dyn WalletProvider>, ledger: Arc<dyn Ledger>) -> Self {
        Self { wallet, ledger }
    }

    /// Returns the ledger used for submissions and balance lookups.
    #[must_use]
    pub fn ledger(&self) -> &dyn Ledger {
        self.ledger.as_ref()
    }

    /// Signs and submits a deposit of `amount` from `creator` to `escrow`.
    ///
    /// Nothing reaches the ledger when the wallet declines to sign.
    ///
    /// # Errors
    ///
    /// Returns [`FundingError`] when signing, submission, or confirmation
    /// fails.
    pub async fn deposit(
        &self,
        creator: &WalletAddress,
        escrow: &WalletAddress,
        amount: Amount,
    ) -> Result<TxId, FundingError> {
        let payment = PaymentTransaction::escrow_deposit(creator.clone(), escrow.clone(), amount);
        let signed = self.wallet.sign(&payment).await?;
        let tx_id = self.ledger.submit(&signed).await?;
        info!(%tx_id, wallet = %creator, %amount, "escrow deposit submitted");
        Ok(tx_id)
    }
}
