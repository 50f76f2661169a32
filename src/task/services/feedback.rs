//! Classification of failures into user-facing feedback.

use super::FundingError;
use crate::task::{
    domain::{FormField, TaskDomainError, ValidationError, ValidationErrors},
    ports::{LedgerError, TaskGatewayError, WalletError},
};

/// How a failure should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input, shown next to the form field before any request.
    Validation,
    /// The caller may not act, or no wallet is connected.
    Unauthorized,
    /// The task changed under the user; the board should be refreshed.
    InvalidState,
    /// The service or ledger could not be reached or answered garbage.
    Transport,
    /// The user dismissed a wallet prompt.
    UserCancelled,
}

impl ErrorKind {
    /// Returns a stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Unauthorized => "unauthorized",
            Self::InvalidState => "invalid_state",
            Self::Transport => "transport",
            Self::UserCancelled => "user_cancelled",
        }
    }

    /// Classifies an HTTP status returned by a remote service.
    #[must_use]
    pub const fn from_http_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            422 => Self::Validation,
            400..=499 => Self::InvalidState,
            _ => Self::Transport,
        }
    }
}

/// Message attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMessage {
    /// Field the message belongs to, when known.
    pub field: Option<FormField>,
    /// Message text.
    pub message: String,
}

impl From<&ValidationError> for InlineMessage {
    fn from(error: &ValidationError) -> Self {
        Self {
            field: Some(error.field()),
            message: error.to_string(),
        }
    }
}

/// Presentation of a failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Messages shown next to form fields.
    Inline(Vec<InlineMessage>),
    /// The control stays disabled with an explanation.
    Blocked {
        /// Explanation.
        message: String,
    },
    /// Transient notification.
    Toast {
        /// Notification text.
        message: String,
        /// Whether the board should be reloaded.
        refresh: bool,
    },
    /// Informational notice.
    Info {
        /// Notice text.
        message: String,
    },
}

impl Feedback {
    /// Builds the default presentation for `kind`.
    #[must_use]
    pub fn for_kind(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::Validation => Self::Inline(vec![InlineMessage {
                field: None,
                message,
            }]),
            ErrorKind::Unauthorized => Self::Blocked { message },
            ErrorKind::InvalidState => Self::Toast {
                message,
                refresh: true,
            },
            ErrorKind::Transport => Self::Toast {
                message,
                refresh: false,
            },
            ErrorKind::UserCancelled => Self::Info { message },
        }
    }

    /// Builds inline messages for every field error.
    #[must_use]
    pub fn inline(errors: &ValidationErrors) -> Self {
        Self::Inline(errors.errors().iter().map(InlineMessage::from).collect())
    }
}

impl TaskDomainError {
    /// Returns the failure kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
        }
    }

    /// Returns how the failure should be shown.
    #[must_use]
    pub fn feedback(&self) -> Feedback {
        match self {
            Self::Validation(error) => Feedback::Inline(vec![InlineMessage::from(error)]),
            other => Feedback::for_kind(other.kind(), other.to_string()),
        }
    }
}

impl TaskGatewayError {
    /// Returns the failure kind.
    ///
    /// Undecodable responses count as transport failures.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::Unsupported(_) => ErrorKind::InvalidState,
            Self::Domain(error) => error.kind(),
            Self::Rejected { status, .. } => ErrorKind::from_http_status(*status),
            Self::Decode(_) | Self::Transport(_) => ErrorKind::Transport,
        }
    }
}

impl WalletError {
    /// Returns the failure kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Cancelled => ErrorKind::UserCancelled,
            Self::Rejected(_) => ErrorKind::Unauthorized,
            Self::Unavailable(_) => ErrorKind::Transport,
        }
    }
}

impl LedgerError {
    /// Returns the failure kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Rejected { status, .. } => ErrorKind::from_http_status(*status),
            Self::NotConfirmed { .. } | Self::Decode(_) | Self::Transport(_) => {
                ErrorKind::Transport
            }
        }
    }
}

impl FundingError {
    /// Returns the failure kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Wallet(error) => error.kind(),
            Self::Ledger(error) => error.kind(),
        }
    }
}
