//! Error types for task domain validation and lifecycle guards.

use super::{TaskAction, TaskId, TaskStatus, WalletAddress};
use std::fmt;
use thiserror::Error;

/// Form field an input validation error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Task title.
    Title,
    /// Task description.
    Description,
    /// Bounty amount.
    Amount,
    /// Optional deadline.
    Deadline,
    /// Proof location.
    ProofUrl,
    /// Dispute justification.
    DisputeReason,
    /// Wallet address.
    WalletAddress,
}

impl FormField {
    /// Returns the form field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Amount => "amount",
            Self::Deadline => "deadline",
            Self::ProofUrl => "proof_url",
            Self::DisputeReason => "dispute_reason",
            Self::WalletAddress => "wallet_address",
        }
    }
}

/// Input rejected before any request is sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The title is empty after trimming.
    #[error("task title is required")]
    EmptyTitle,

    /// The title exceeds the accepted length.
    #[error("task title must be at most {maximum} characters")]
    TitleTooLong {
        /// Accepted maximum.
        maximum: usize,
    },

    /// The description is empty after trimming.
    #[error("description is required")]
    EmptyDescription,

    /// The description exceeds the accepted length.
    #[error("description must be at most {maximum} characters")]
    DescriptionTooLong {
        /// Accepted maximum.
        maximum: usize,
    },

    /// The amount is not a positive decimal.
    #[error("enter a valid amount, got '{0}'")]
    InvalidAmount(String),

    /// The deadline is not a calendar date.
    #[error("invalid deadline '{0}', expected YYYY-MM-DD")]
    InvalidDeadline(String),

    /// The proof location is empty.
    #[error("proof URL must not be empty")]
    EmptyProofUrl,

    /// The dispute reason is too short.
    #[error("dispute reason must be at least {minimum} characters, got {actual}")]
    DisputeReasonTooShort {
        /// Accepted minimum.
        minimum: usize,
        /// Characters supplied after trimming.
        actual: usize,
    },

    /// The wallet address is empty or malformed.
    #[error("invalid wallet address '{0}'")]
    InvalidWalletAddress(String),
}

impl ValidationError {
    /// Returns the form field the error should be shown next to.
    #[must_use]
    pub const fn field(&self) -> FormField {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => FormField::Title,
            Self::EmptyDescription | Self::DescriptionTooLong { .. } => FormField::Description,
            Self::InvalidAmount(_) => FormField::Amount,
            Self::InvalidDeadline(_) => FormField::Deadline,
            Self::EmptyProofUrl => FormField::ProofUrl,
            Self::DisputeReasonTooShort { .. } => FormField::DisputeReason,
            Self::InvalidWalletAddress(_) => FormField::WalletAddress,
        }
    }
}

/// Every field error found while validating a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub(crate) const fn new(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }

    /// Returns the individual field errors in form order.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Returns the error reported for `field`, if any.
    #[must_use]
    pub fn for_field(&self, field: FormField) -> Option<&ValidationError> {
        self.0.iter().find(|error| error.field() == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Errors raised by task lifecycle guards.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The task's status no longer permits the action.
    #[error("cannot {action} task {task_id} while it is {status}")]
    InvalidState {
        /// Task the action targeted.
        task_id: TaskId,
        /// Status the task was in.
        status: TaskStatus,
        /// Rejected action.
        action: TaskAction,
    },

    /// The caller may not perform the action on this task.
    #[error("{caller} is not allowed to {action} task {task_id}")]
    Unauthorized {
        /// Task the action targeted.
        task_id: TaskId,
        /// Rejected caller.
        caller: WalletAddress,
        /// Rejected action.
        action: TaskAction,
    },
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
