//! Role hints chosen at wallet connection.

use crate::task::domain::TaskAction;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// How the user intends to use the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleHint {
    /// Posts and funds tasks.
    Poster,
    /// Claims and completes tasks.
    Acceptor,
}

impl RoleHint {
    /// Returns the stored name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poster => "poster",
            Self::Acceptor => "acceptor",
        }
    }

    /// Parses a role name, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ParseRoleHintError`] for unknown names.
    pub fn parse(value: &str) -> Result<Self, ParseRoleHintError> {
        let normalized = value.trim();
        if normalized.eq_ignore_ascii_case("poster") {
            Ok(Self::Poster)
        } else if normalized.eq_ignore_ascii_case("acceptor") {
            Ok(Self::Acceptor)
        } else {
            Err(ParseRoleHintError(value.to_owned()))
        }
    }

    /// Returns whether controls for `action` are highlighted for this role.
    #[must_use]
    pub const fn emphasises(self, action: TaskAction) -> bool {
        match self {
            Self::Poster => matches!(action, TaskAction::Approve | TaskAction::Cancel),
            Self::Acceptor => matches!(action, TaskAction::Claim | TaskAction::SubmitProof),
        }
    }
}

impl fmt::Display for RoleHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for unknown role names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleHintError(pub String);
