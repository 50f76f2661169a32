//! Identifier and validated scalar types for the task domain.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a task record.
///
/// Identifiers are assigned by the task service. In fixture mode the local
/// store mints timestamp-based identifiers instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an identifier issued by the task service.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wallet address identifying a creator, worker, or caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Creates a validated wallet address.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidWalletAddress`] when the trimmed
    /// value is empty or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidWalletAddress(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

/// Ledger transaction reference (escrow deposit or payout).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    /// Wraps a ledger transaction identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location of the proof of work submitted by a worker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProofUrl(String);

impl ProofUrl {
    /// Creates a validated proof location.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyProofUrl`] when the trimmed value is
    /// empty.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(ValidationError::EmptyProofUrl);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the proof location as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProofUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProofUrl {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProofUrl> for String {
    fn from(value: ProofUrl) -> Self {
        value.0
    }
}

/// Free-text justification attached to a dispute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisputeReason(String);

impl DisputeReason {
    /// Minimum number of characters a trimmed reason must contain.
    pub const MIN_CHARS: usize = 5;

    /// Creates a validated dispute reason.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DisputeReasonTooShort`] when the trimmed
    /// reason has fewer than [`Self::MIN_CHARS`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let normalized = raw.trim();
        let length = normalized.chars().count();
        if length < Self::MIN_CHARS {
            return Err(ValidationError::DisputeReasonTooShort {
                minimum: Self::MIN_CHARS,
                actual: length,
            });
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Wraps a reason already recorded by the task service.
    pub(crate) fn from_service(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_owned())
    }

    /// Returns the reason as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisputeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DisputeReason {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DisputeReason> for String {
    fn from(value: DisputeReason) -> Self {
        value.0
    }
}
