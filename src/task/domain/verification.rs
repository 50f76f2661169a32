//! AI verification results and escrow account details.

use super::{Amount, TaskId, WalletAddress};
use serde::{Deserialize, Serialize};

/// Outcome of an automated proof review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// The proof satisfies the task description.
    Pass,
    /// The proof does not satisfy the task description.
    Fail,
}

/// Result of an automated proof review for one task.
#[derive(Debug, Clone, PartialEq)]
pub struct AiVerification {
    /// Reviewed task.
    pub task_id: TaskId,
    /// Pass/fail verdict.
    pub verdict: Verdict,
    /// Confidence score in `0.0..=1.0`.
    pub score: f64,
    /// Short explanation of the verdict.
    pub reasoning: Option<String>,
    /// Longer audit report, when produced.
    pub report: Option<String>,
}

/// Escrow account details reported by the task service.
#[derive(Debug, Clone, PartialEq)]
pub struct EscrowInfo {
    /// Escrow account receiving deposits.
    pub address: Option<WalletAddress>,
    /// Current escrow balance.
    pub balance: Option<Amount>,
    /// Platform fee in percent.
    pub fee_percent: f64,
    /// Whether the escrow account is configured on the service.
    pub configured: bool,
}

impl EscrowInfo {
    /// Escrow details for a service without a configured escrow account.
    #[must_use]
    pub const fn unconfigured() -> Self {
        Self {
            address: None,
            balance: None,
            fee_percent: 0.0,
            configured: false,
        }
    }

    /// Returns the deposit address when the escrow is usable.
    #[must_use]
    pub fn deposit_address(&self) -> Option<&WalletAddress> {
        self.address.as_ref().filter(|_| self.configured)
    }
}
