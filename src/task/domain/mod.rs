//! Domain model for the task lifecycle.
//!
//! Tasks move through a fixed state machine whose guards are evaluated here,
//! free of any transport or storage concern. Remote services remain the
//! authority; these guards decide what the client attempts and shows.

mod amount;
mod display;
mod draft;
mod error;
mod ids;
mod status;
mod task;
mod verification;

pub use amount::Amount;
pub use display::{LIFECYCLE_STEPS, LifecycleStep, StatusDisplay};
pub use draft::TaskDraft;
pub use error::{FormField, ParseTaskStatusError, TaskDomainError, ValidationError, ValidationErrors};
pub use ids::{DisputeReason, ProofUrl, TaskId, TxId, WalletAddress};
pub use status::{StatusFilter, TaskAction, TaskStatus};
pub use task::{Dispute, PersistedTaskData, Task};
pub use verification::{AiVerification, EscrowInfo, Verdict};
