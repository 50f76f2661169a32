//! Display metadata for task statuses.

use super::TaskStatus;

/// Step of the lifecycle progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleStep {
    /// Step caption.
    pub label: &'static str,
}

/// Steps of the happy-path progress indicator.
pub const LIFECYCLE_STEPS: [LifecycleStep; 5] = [
    LifecycleStep { label: "Post" },
    LifecycleStep { label: "Claim" },
    LifecycleStep { label: "Submit" },
    LifecycleStep { label: "Approve" },
    LifecycleStep { label: "Paid" },
];

/// Presentation metadata for one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDisplay {
    /// Human-readable label.
    pub label: &'static str,
    /// Badge style class.
    pub badge_class: &'static str,
    /// Index into [`LIFECYCLE_STEPS`]; `None` once the task has left the
    /// happy path.
    pub step: Option<usize>,
}

const OPEN: StatusDisplay = StatusDisplay {
    label: "Open",
    badge_class: "badge-open",
    step: Some(0),
};
const CLAIMED: StatusDisplay = StatusDisplay {
    label: "Claimed",
    badge_class: "badge-claimed",
    step: Some(1),
};
const SUBMITTED: StatusDisplay = StatusDisplay {
    label: "Submitted",
    badge_class: "badge-submitted",
    step: Some(2),
};
const COMPLETED: StatusDisplay = StatusDisplay {
    label: "Completed",
    badge_class: "badge-completed",
    step: Some(4),
};
const CANCELLED: StatusDisplay = StatusDisplay {
    label: "Cancelled",
    badge_class: "badge-cancelled",
    step: None,
};
const DISPUTED: StatusDisplay = StatusDisplay {
    label: "Disputed",
    badge_class: "badge-disputed",
    step: None,
};
const EXPIRED: StatusDisplay = StatusDisplay {
    label: "Expired",
    badge_class: "badge-expired",
    step: None,
};

impl TaskStatus {
    /// Returns the display metadata for the status.
    #[must_use]
    pub const fn display(self) -> &'static StatusDisplay {
        match self {
            Self::Open => &OPEN,
            Self::Claimed => &CLAIMED,
            Self::Submitted => &SUBMITTED,
            Self::Completed => &COMPLETED,
            Self::Cancelled => &CANCELLED,
            Self::Disputed => &DISPUTED,
            Self::Expired => &EXPIRED,
        }
    }
}
