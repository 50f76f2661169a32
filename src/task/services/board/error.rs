//! Errors returned by task board operations.

use super::super::{ErrorKind, Feedback, FundingError};
use crate::task::{
    domain::{TaskAction, TaskDomainError, TaskId, TaskStatus, ValidationErrors},
    ports::{LedgerError, TaskGatewayError},
};
use thiserror::Error;

/// Board operation failure.
///
/// Local state is left as it was before the failed operation.
#[derive(Debug, Clone, Error)]
pub enum BoardError {
    /// A lifecycle guard or single-field validation rejected the request.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The task form has one or more invalid fields.
    #[error(transparent)]
    Form(#[from] ValidationErrors),

    /// The task service failed or rejected the request.
    #[error(transparent)]
    Gateway(#[from] TaskGatewayError),

    /// The operation needs a connected wallet.
    #[error("connect a wallet first")]
    NotConnected,

    /// The task is not on the board.
    #[error("task {0} is not on the board")]
    UnknownTask(TaskId),

    /// The same action is already running for this task.
    #[error("{action} is already in progress for task {task_id}")]
    AlreadyPending {
        /// Targeted task.
        task_id: TaskId,
        /// Running action.
        action: TaskAction,
    },

    /// Automated review only applies to submitted work.
    #[error("task {task_id} is {status}; only submitted work can be verified")]
    NotSubmitted {
        /// Targeted task.
        task_id: TaskId,
        /// Current status.
        status: TaskStatus,
    },

    /// Locking the bounty in escrow failed.
    #[error(transparent)]
    Funding(#[from] FundingError),

    /// The ledger failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// No ledger is configured.
    #[error("no ledger is configured")]
    NoLedger,

    /// The board was detached before the response arrived.
    #[error("response discarded after the board was detached")]
    Detached,
}

impl BoardError {
    /// Returns the failure kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(error) => error.kind(),
            Self::Form(_) => ErrorKind::Validation,
            Self::Gateway(error) => error.kind(),
            Self::NotConnected => ErrorKind::Unauthorized,
            Self::UnknownTask(_)
            | Self::AlreadyPending { .. }
            | Self::NotSubmitted { .. }
            | Self::Detached => ErrorKind::InvalidState,
            Self::Funding(error) => error.kind(),
            Self::Ledger(error) => error.kind(),
            Self::NoLedger => ErrorKind::Transport,
        }
    }

    /// Returns how the failure should be shown.
    ///
    /// Detached responses are not shown at all.
    #[must_use]
    pub fn feedback(&self) -> Option<Feedback> {
        match self {
            Self::Detached => None,
            Self::Domain(error) => Some(error.feedback()),
            Self::Form(errors) => Some(Feedback::inline(errors)),
            other => Some(Feedback::for_kind(other.kind(), other.to_string())),
        }
    }
}
