//! Task aggregate root and its guarded lifecycle transitions.

use super::{
    Amount, DisputeReason, ProofUrl, TaskAction, TaskDomainError, TaskDraft, TaskId, TaskStatus,
    TxId, WalletAddress,
};
use chrono::{DateTime, NaiveDate, Utc};

/// Dispute details recorded when a task is frozen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispute {
    /// Party that raised the dispute.
    pub raised_by: WalletAddress,
    /// Justification supplied by that party.
    pub reason: DisputeReason,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    amount: Amount,
    creator: WalletAddress,
    worker: Option<WalletAddress>,
    status: TaskStatus,
    proof_url: Option<ProofUrl>,
    deadline: Option<NaiveDate>,
    dispute: Option<Dispute>,
    created_at: Option<DateTime<Utc>>,
    tx_id: Option<TxId>,
}

/// Parameter object for reconstructing a task reported by the task service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Bounty amount.
    pub amount: Amount,
    /// Posting party.
    pub creator: WalletAddress,
    /// Claiming party, if any.
    pub worker: Option<WalletAddress>,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Submitted proof, if any.
    pub proof_url: Option<ProofUrl>,
    /// Informational deadline.
    pub deadline: Option<NaiveDate>,
    /// Dispute details, if any.
    pub dispute: Option<Dispute>,
    /// Creation timestamp reported by the service.
    pub created_at: Option<DateTime<Utc>>,
    /// Escrow or payout transaction reference.
    pub tx_id: Option<TxId>,
}

impl Task {
    /// Creates a new open task from a validated draft.
    #[must_use]
    pub fn open(
        id: TaskId,
        draft: TaskDraft,
        creator: WalletAddress,
        created_at: DateTime<Utc>,
        tx_id: Option<TxId>,
    ) -> Self {
        let TaskDraft {
            title,
            description,
            amount,
            deadline,
        } = draft;
        Self {
            id,
            title,
            description,
            amount,
            creator,
            worker: None,
            status: TaskStatus::Open,
            proof_url: None,
            deadline,
            dispute: None,
            created_at: Some(created_at),
            tx_id,
        }
    }

    /// Reconstructs a task reported by the task service.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            amount: data.amount,
            creator: data.creator,
            worker: data.worker,
            status: data.status,
            proof_url: data.proof_url,
            deadline: data.deadline,
            dispute: data.dispute,
            created_at: data.created_at,
            tx_id: data.tx_id,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the bounty amount.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns the posting party.
    #[must_use]
    pub const fn creator(&self) -> &WalletAddress {
        &self.creator
    }

    /// Returns the claiming party, if any.
    #[must_use]
    pub const fn worker(&self) -> Option<&WalletAddress> {
        self.worker.as_ref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the submitted proof, if any.
    #[must_use]
    pub const fn proof_url(&self) -> Option<&ProofUrl> {
        self.proof_url.as_ref()
    }

    /// Returns the informational deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<NaiveDate> {
        self.deadline
    }

    /// Returns dispute details when the task is disputed.
    #[must_use]
    pub const fn dispute(&self) -> Option<&Dispute> {
        self.dispute.as_ref()
    }

    /// Returns the creation timestamp, if known.
    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the escrow or payout transaction reference, if any.
    #[must_use]
    pub const fn tx_id(&self) -> Option<&TxId> {
        self.tx_id.as_ref()
    }

    /// Returns whether `address` posted this task.
    #[must_use]
    pub fn is_creator(&self, address: &WalletAddress) -> bool {
        &self.creator == address
    }

    /// Returns whether `address` is the assigned worker.
    #[must_use]
    pub fn is_worker(&self, address: &WalletAddress) -> bool {
        self.worker.as_ref() == Some(address)
    }

    /// Checks whether `caller` may perform `action` in the current status.
    ///
    /// The status guard is evaluated before the caller guard.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] when the status does not
    /// permit the action, or [`TaskDomainError::Unauthorized`] when the
    /// caller may not perform it.
    pub fn check(&self, action: TaskAction, caller: &WalletAddress) -> Result<(), TaskDomainError> {
        if !action.source_statuses().contains(&self.status) {
            return Err(TaskDomainError::InvalidState {
                task_id: self.id.clone(),
                status: self.status,
                action,
            });
        }

        let authorized = match action {
            TaskAction::Claim => !self.is_creator(caller),
            TaskAction::SubmitProof => self.is_worker(caller),
            TaskAction::Approve | TaskAction::Cancel => self.is_creator(caller),
            TaskAction::Dispute => self.is_creator(caller) || self.is_worker(caller),
        };
        if !authorized {
            return Err(TaskDomainError::Unauthorized {
                task_id: self.id.clone(),
                caller: caller.clone(),
                action,
            });
        }
        Ok(())
    }

    /// Claims the task for `worker`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] unless the task is open and
    /// [`TaskDomainError::Unauthorized`] when the worker is the creator.
    pub fn claim(&mut self, worker: &WalletAddress) -> Result<(), TaskDomainError> {
        self.check(TaskAction::Claim, worker)?;
        self.worker = Some(worker.clone());
        self.status = TaskAction::Claim.target_status();
        Ok(())
    }

    /// Records proof of completed work.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] unless the task is claimed
    /// and [`TaskDomainError::Unauthorized`] unless `caller` is the worker.
    pub fn submit_proof(
        &mut self,
        caller: &WalletAddress,
        proof_url: ProofUrl,
    ) -> Result<(), TaskDomainError> {
        self.check(TaskAction::SubmitProof, caller)?;
        self.proof_url = Some(proof_url);
        self.status = TaskAction::SubmitProof.target_status();
        Ok(())
    }

    /// Approves submitted work, completing the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] unless proof was submitted
    /// and [`TaskDomainError::Unauthorized`] unless `caller` is the creator.
    pub fn approve(&mut self, caller: &WalletAddress) -> Result<(), TaskDomainError> {
        self.check(TaskAction::Approve, caller)?;
        self.status = TaskAction::Approve.target_status();
        Ok(())
    }

    /// Cancels an unclaimed task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] unless the task is open and
    /// [`TaskDomainError::Unauthorized`] unless `caller` is the creator.
    pub fn cancel(&mut self, caller: &WalletAddress) -> Result<(), TaskDomainError> {
        self.check(TaskAction::Cancel, caller)?;
        self.status = TaskAction::Cancel.target_status();
        Ok(())
    }

    /// Freezes the task with a dispute raised by `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] unless the task is claimed
    /// or submitted and [`TaskDomainError::Unauthorized`] unless `caller` is
    /// the creator or the worker.
    pub fn raise_dispute(
        &mut self,
        caller: &WalletAddress,
        reason: DisputeReason,
    ) -> Result<(), TaskDomainError> {
        self.check(TaskAction::Dispute, caller)?;
        self.dispute = Some(Dispute {
            raised_by: caller.clone(),
            reason,
        });
        self.status = TaskAction::Dispute.target_status();
        Ok(())
    }

    /// Returns the actions `caller` may currently perform.
    #[must_use]
    pub fn permitted_actions(&self, caller: &WalletAddress) -> Vec<TaskAction> {
        TaskAction::ALL
            .into_iter()
            .filter(|action| self.check(*action, caller).is_ok())
            .collect()
    }
}
