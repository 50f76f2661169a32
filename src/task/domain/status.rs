//! Task lifecycle status, lifecycle actions, and status filters.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Posted and waiting for a worker.
    Open,
    /// A worker has claimed the task.
    Claimed,
    /// The worker has submitted proof of completion.
    Submitted,
    /// The creator approved the proof and funds were released.
    Completed,
    /// The creator cancelled the task before it was claimed.
    Cancelled,
    /// Creator or worker raised a dispute; frozen until resolved externally.
    Disputed,
    /// The deadline passed without completion.
    Expired,
}

impl TaskStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::Open,
        Self::Claimed,
        Self::Submitted,
        Self::Completed,
        Self::Cancelled,
        Self::Disputed,
        Self::Expired,
    ];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Claimed => "CLAIMED",
            Self::Submitted => "SUBMITTED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Disputed => "DISPUTED",
            Self::Expired => "EXPIRED",
        }
    }

    /// Returns whether the lifecycle permits moving from `self` to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::Claimed | Self::Cancelled | Self::Expired)
                | (Self::Claimed, Self::Submitted | Self::Disputed)
                | (Self::Submitted, Self::Completed | Self::Disputed)
        )
    }

    /// Returns whether the status ends the lifecycle.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Expired)
    }

    /// Returns whether the status is frozen pending external resolution.
    #[must_use]
    pub const fn is_frozen(self) -> bool {
        matches!(self, Self::Disputed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseTaskStatusError(value.to_owned()))
    }
}

/// User-initiated lifecycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskAction {
    /// Take an open task as its worker.
    Claim,
    /// Attach proof of completed work.
    SubmitProof,
    /// Accept the proof and release funds.
    Approve,
    /// Withdraw an unclaimed task and refund the escrow.
    Cancel,
    /// Freeze the task pending external resolution.
    Dispute,
}

impl TaskAction {
    /// Every lifecycle action.
    pub const ALL: [Self; 5] = [
        Self::Claim,
        Self::SubmitProof,
        Self::Approve,
        Self::Cancel,
        Self::Dispute,
    ];

    /// Statuses from which the action may be taken.
    #[must_use]
    pub const fn source_statuses(self) -> &'static [TaskStatus] {
        match self {
            Self::Claim | Self::Cancel => &[TaskStatus::Open],
            Self::SubmitProof => &[TaskStatus::Claimed],
            Self::Approve => &[TaskStatus::Submitted],
            Self::Dispute => &[TaskStatus::Claimed, TaskStatus::Submitted],
        }
    }

    /// Status a successful action moves the task into.
    #[must_use]
    pub const fn target_status(self) -> TaskStatus {
        match self {
            Self::Claim => TaskStatus::Claimed,
            Self::SubmitProof => TaskStatus::Submitted,
            Self::Approve => TaskStatus::Completed,
            Self::Cancel => TaskStatus::Cancelled,
            Self::Dispute => TaskStatus::Disputed,
        }
    }

    /// Returns a stable name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::SubmitProof => "submit_proof",
            Self::Approve => "approve",
            Self::Cancel => "cancel",
            Self::Dispute => "dispute",
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Board filter selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Show every task.
    #[default]
    All,
    /// Show only tasks with the given status.
    Only(TaskStatus),
}

impl StatusFilter {
    /// Filter labels offered on the board.
    pub const LABELS: [&'static str; 5] = ["All", "Open", "Claimed", "Submitted", "Completed"];

    /// Parses a filter label, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`ParseTaskStatusError`] when the label names neither `All`
    /// nor a known status.
    pub fn parse(label: &str) -> Result<Self, ParseTaskStatusError> {
        if label.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        TaskStatus::try_from(label).map(Self::Only)
    }

    /// Returns whether a task with `status` passes the filter.
    #[must_use]
    pub fn matches(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == status,
        }
    }
}
