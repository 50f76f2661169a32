//! Client-side task board.
//!
//! The board caches the task list, evaluates lifecycle guards before any
//! request is sent, and reconciles the cache with the service's answer.

mod error;

pub use error::BoardError;

use super::{EscrowFunding, ErrorKind, Leaderboard, PostTaskRequest};
use crate::session::WalletSession;
use crate::task::{
    domain::{
        AiVerification, Amount, DisputeReason, EscrowInfo, ParseTaskStatusError, ProofUrl,
        StatusFilter, Task, TaskAction, TaskDomainError, TaskDraft, TaskId, TaskStatus, TxId,
        WalletAddress,
    },
    ports::{CreateTaskCommand, GatewayMode, TaskGateway, TaskGatewayResult},
};
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// When a lifecycle transition becomes visible on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    /// Apply locally before the request and roll back if it fails.
    #[default]
    Optimistic,
    /// Apply only once the service confirms.
    Pessimistic,
}

impl UpdatePolicy {
    /// Returns the configuration name of the policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Optimistic => "optimistic",
            Self::Pessimistic => "pessimistic",
        }
    }

    /// Parses a policy name, ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim();
        [Self::Optimistic, Self::Pessimistic]
            .into_iter()
            .find(|policy| policy.as_str().eq_ignore_ascii_case(normalized))
    }
}

/// Whether a lifecycle control is enabled and highlighted for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionHint {
    /// Lifecycle action.
    pub action: TaskAction,
    /// The connected wallet passes the action's guard.
    pub permitted: bool,
    /// The session role suggests this action.
    pub emphasised: bool,
}

impl ActionHint {
    /// Evaluates every lifecycle control of `task` for `session`.
    ///
    /// The role hint never changes `permitted`.
    #[must_use]
    pub fn for_task(session: &WalletSession, task: &Task) -> Vec<Self> {
        TaskAction::ALL
            .into_iter()
            .map(|action| {
                let permitted = session
                    .address()
                    .is_some_and(|caller| task.check(action, caller).is_ok());
                let emphasised =
                    permitted && session.role().is_some_and(|role| role.emphasises(action));
                Self {
                    action,
                    permitted,
                    emphasised,
                }
            })
            .collect()
    }
}

#[derive(Debug, Default)]
struct BoardState {
    tasks: Vec<Task>,
    in_flight: HashSet<(TaskId, TaskAction)>,
    epoch: u64,
}

impl BoardState {
    fn find(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    fn find_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    fn replace(&mut self, task: &Task) {
        if let Some(slot) = self.find_mut(task.id()) {
            slot.clone_from(task);
        }
    }
}

/// Bookkeeping for one transition between request and response.
///
/// Dropping an unsettled transition releases its in-flight key and undoes
/// its optimistic write, so a cancelled call leaves no trace on the board.
struct PendingTransition<'board> {
    state: &'board RwLock<BoardState>,
    key: (TaskId, TaskAction),
    epoch: u64,
    snapshot: Task,
    optimistic: Option<Task>,
    settled: bool,
}

impl PendingTransition<'_> {
    fn release(&mut self, state: &mut BoardState) {
        state.in_flight.remove(&self.key);
        self.settled = true;
    }

    /// Restores the snapshot while our optimistic write is still current.
    fn roll_back(&self, state: &mut BoardState) {
        if let Some(optimistic) = &self.optimistic {
            if state.find(&self.key.0) == Some(optimistic) {
                state.replace(&self.snapshot);
            }
        }
    }
}

impl Drop for PendingTransition<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.in_flight.remove(&self.key);
        self.roll_back(&mut state);
        debug!(task_id = %self.key.0, action = %self.key.1, "transition abandoned");
    }
}

/// Shared task board.
///
/// All methods take `&self`; share the board through [`Arc`].
pub struct TaskBoard {
    gateway: Arc<dyn TaskGateway>,
    state: RwLock<BoardState>,
    escrow: RwLock<Option<EscrowInfo>>,
    policy: UpdatePolicy,
    funding: Option<EscrowFunding>,
}

fn require_address(session: &WalletSession) -> BoardResult<&WalletAddress> {
    session.address().ok_or(BoardError::NotConnected)
}

impl TaskBoard {
    /// Creates an empty board over `gateway` using optimistic updates.
    #[must_use]
    pub fn new(gateway: Arc<dyn TaskGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(BoardState::default()),
            escrow: RwLock::new(None),
            policy: UpdatePolicy::default(),
            funding: None,
        }
    }

    /// Sets the update policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: UpdatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enables escrow deposits when posting in remote mode.
    #[must_use]
    pub fn with_funding(mut self, funding: EscrowFunding) -> Self {
        self.funding = Some(funding);
        self
    }

    /// Reports which gateway implementation serves the board.
    #[must_use]
    pub fn mode(&self) -> GatewayMode {
        self.gateway.mode()
    }

    /// Returns the update policy.
    #[must_use]
    pub const fn policy(&self) -> UpdatePolicy {
        self.policy
    }

    fn read(&self) -> RwLockReadGuard<'_, BoardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BoardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn epoch(&self) -> u64 {
        self.read().epoch
    }

    /// Replaces the cached list with the service's current tasks.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Gateway`] when the list cannot be fetched and
    /// [`BoardError::Detached`] when the board was detached meanwhile. The
    /// cache is left untouched in both cases.
    pub async fn refresh(&self, session: &WalletSession) -> BoardResult<usize> {
        let epoch = self.epoch();
        let tasks = self.gateway.list_tasks(session.address()).await?;
        let mut state = self.write();
        if state.epoch != epoch {
            return Err(BoardError::Detached);
        }
        let count = tasks.len();
        state.tasks = tasks;
        debug!(count, mode = self.mode().as_str(), "board refreshed");
        Ok(count)
    }

    /// Returns every cached task in board order.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.read().tasks.clone()
    }

    /// Returns one cached task.
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<Task> {
        self.read().find(id).cloned()
    }

    /// Returns the cached tasks matching `filter`.
    #[must_use]
    pub fn filter(&self, filter: StatusFilter) -> Vec<Task> {
        self.select(|task| filter.matches(task.status()))
    }

    /// Returns the cached tasks matching a filter label such as `"Open"`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseTaskStatusError`] for unknown labels.
    pub fn filter_by_label(&self, label: &str) -> Result<Vec<Task>, ParseTaskStatusError> {
        Ok(self.filter(StatusFilter::parse(label)?))
    }

    /// Returns the tasks created by `address`.
    #[must_use]
    pub fn posted_by(&self, address: &WalletAddress) -> Vec<Task> {
        self.select(|task| task.is_creator(address))
    }

    /// Returns the tasks claimed by `address`.
    #[must_use]
    pub fn claimed_by(&self, address: &WalletAddress) -> Vec<Task> {
        self.select(|task| task.is_worker(address))
    }

    /// Aggregates the cached tasks into rankings.
    #[must_use]
    pub fn leaderboard(&self) -> Leaderboard {
        Leaderboard::from_tasks(&self.read().tasks)
    }

    fn select(&self, predicate: impl Fn(&Task) -> bool) -> Vec<Task> {
        self.read()
            .tasks
            .iter()
            .filter(|task| predicate(task))
            .cloned()
            .collect()
    }

    /// Reports which lifecycle controls to enable and highlight.
    ///
    /// The role hint never changes `permitted`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownTask`] when the task is not cached.
    pub fn action_hints(
        &self,
        session: &WalletSession,
        id: &TaskId,
    ) -> BoardResult<Vec<ActionHint>> {
        let state = self.read();
        let task = state
            .find(id)
            .ok_or_else(|| BoardError::UnknownTask(id.clone()))?;
        Ok(ActionHint::for_task(session, task))
    }

    /// Discards responses to every call started before now.
    pub fn detach(&self) {
        let mut state = self.write();
        state.epoch = state.epoch.wrapping_add(1);
        debug!(epoch = state.epoch, "board detached");
    }

    /// Claims an open task for the connected wallet.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] when no wallet is connected, a guard rejects
    /// the claim, or the service fails.
    pub async fn claim(&self, session: &WalletSession, id: &TaskId) -> BoardResult<Task> {
        let caller = require_address(session)?;
        let pending = self.begin(id, TaskAction::Claim, |task| task.claim(caller))?;
        let outcome = self.gateway.claim(id, caller).await;
        self.finish(session, id, TaskAction::Claim, pending, outcome)
            .await
    }

    /// Submits proof of work for a claimed task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] when the proof URL is empty, a guard rejects
    /// the submission, or the service fails.
    pub async fn submit_proof(
        &self,
        session: &WalletSession,
        id: &TaskId,
        proof_url: &str,
        ai_verify: bool,
    ) -> BoardResult<Task> {
        let proof = ProofUrl::new(proof_url).map_err(TaskDomainError::from)?;
        let caller = require_address(session)?;
        let pending = self.begin(id, TaskAction::SubmitProof, |task| {
            task.submit_proof(caller, proof.clone())
        })?;
        let outcome = self
            .gateway
            .submit_proof(id, caller, &proof, ai_verify)
            .await;
        self.finish(session, id, TaskAction::SubmitProof, pending, outcome)
            .await
    }

    /// Approves submitted work, releasing the bounty.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] when a guard rejects the approval or the
    /// service fails.
    pub async fn approve(&self, session: &WalletSession, id: &TaskId) -> BoardResult<Task> {
        let caller = require_address(session)?;
        let pending = self.begin(id, TaskAction::Approve, |task| task.approve(caller))?;
        let outcome = self.gateway.approve(id, caller).await;
        self.finish(session, id, TaskAction::Approve, pending, outcome)
            .await
    }

    /// Cancels an open task, refunding the escrow.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] when a guard rejects the cancellation or the
    /// service fails.
    pub async fn cancel(&self, session: &WalletSession, id: &TaskId) -> BoardResult<Task> {
        let caller = require_address(session)?;
        let pending = self.begin(id, TaskAction::Cancel, |task| task.cancel(caller))?;
        let outcome = self.gateway.cancel(id, caller).await;
        self.finish(session, id, TaskAction::Cancel, pending, outcome)
            .await
    }

    /// Raises a dispute, freezing the task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] when the reason is too short, a guard rejects
    /// the dispute, or the service fails.
    pub async fn dispute(
        &self,
        session: &WalletSession,
        id: &TaskId,
        reason: &str,
    ) -> BoardResult<Task> {
        let justification = DisputeReason::new(reason).map_err(TaskDomainError::from)?;
        let caller = require_address(session)?;
        let pending = self.begin(id, TaskAction::Dispute, |task| {
            task.raise_dispute(caller, justification.clone())
        })?;
        let outcome = self.gateway.dispute(id, caller, &justification).await;
        self.finish(session, id, TaskAction::Dispute, pending, outcome)
            .await
    }

    fn begin(
        &self,
        id: &TaskId,
        action: TaskAction,
        apply: impl FnOnce(&mut Task) -> Result<(), TaskDomainError>,
    ) -> BoardResult<PendingTransition<'_>> {
        let mut state = self.write();
        let key = (id.clone(), action);
        if state.in_flight.contains(&key) {
            return Err(BoardError::AlreadyPending {
                task_id: id.clone(),
                action,
            });
        }
        let snapshot = state
            .find(id)
            .cloned()
            .ok_or_else(|| BoardError::UnknownTask(id.clone()))?;
        let mut updated = snapshot.clone();
        apply(&mut updated)?;
        let optimistic = match self.policy {
            UpdatePolicy::Optimistic => {
                state.replace(&updated);
                Some(updated)
            }
            UpdatePolicy::Pessimistic => None,
        };
        state.in_flight.insert(key.clone());
        debug!(task_id = %id, %action, policy = self.policy.as_str(), "transition started");
        Ok(PendingTransition {
            state: &self.state,
            key,
            epoch: state.epoch,
            snapshot,
            optimistic,
            settled: false,
        })
    }

    async fn finish(
        &self,
        session: &WalletSession,
        id: &TaskId,
        action: TaskAction,
        mut pending: PendingTransition<'_>,
        outcome: TaskGatewayResult<Task>,
    ) -> BoardResult<Task> {
        let failure = {
            let mut state = self.write();
            pending.release(&mut state);
            if state.epoch != pending.epoch {
                pending.roll_back(&mut state);
                debug!(task_id = %id, %action, "discarding response after detach");
                return Err(BoardError::Detached);
            }
            match outcome {
                Ok(task) => {
                    state.replace(&task);
                    info!(task_id = %id, %action, status = %task.status(), "transition confirmed");
                    return Ok(task);
                }
                Err(error) => {
                    // A newer refresh wins over the snapshot.
                    pending.roll_back(&mut state);
                    error
                }
            }
        };
        let kind = failure.kind();
        warn!(task_id = %id, %action, kind = kind.as_str(), error = %failure, "transition failed");
        if kind == ErrorKind::InvalidState {
            if let Err(refresh_error) = self.refresh(session).await {
                warn!(error = %refresh_error, "refresh after rejected transition failed");
            }
        }
        Err(BoardError::Gateway(failure))
    }

    /// Validates and posts a new task, funding escrow when possible.
    ///
    /// The created task is placed at the head of the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Form`] listing every invalid field before any
    /// request, [`BoardError::NotConnected`] without a wallet, and funding
    /// or gateway failures otherwise.
    pub async fn post_task(
        &self,
        session: &WalletSession,
        request: PostTaskRequest,
    ) -> BoardResult<Task> {
        let draft = TaskDraft::parse(
            &request.title,
            &request.description,
            &request.amount,
            request.deadline.as_deref(),
        )?;
        let creator = require_address(session)?;
        let epoch = self.epoch();
        let tx_id = self.fund_escrow(creator, draft.amount()).await?;
        let command = CreateTaskCommand {
            draft,
            creator: creator.clone(),
            tx_id,
        };
        let task = self.gateway.create_task(&command).await?;
        let mut state = self.write();
        if state.epoch != epoch {
            return Err(BoardError::Detached);
        }
        state.tasks.insert(0, task.clone());
        info!(task_id = %task.id(), amount = %task.amount(), "task posted");
        Ok(task)
    }

    async fn fund_escrow(
        &self,
        creator: &WalletAddress,
        amount: Amount,
    ) -> BoardResult<Option<TxId>> {
        let Some(funding) = &self.funding else {
            return Ok(None);
        };
        if self.mode() != GatewayMode::Remote {
            return Ok(None);
        }
        let escrow = self.escrow_info().await?;
        let Some(deposit_address) = escrow.deposit_address() else {
            debug!("escrow not configured; posting without deposit");
            return Ok(None);
        };
        let tx_id = funding.deposit(creator, deposit_address, amount).await?;
        Ok(Some(tx_id))
    }

    /// Runs automated review of a submitted proof.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotSubmitted`] unless the cached task is
    /// submitted, and gateway failures otherwise.
    pub async fn ai_verify(
        &self,
        session: &WalletSession,
        id: &TaskId,
    ) -> BoardResult<AiVerification> {
        let status = self
            .task(id)
            .map(|task| task.status())
            .ok_or_else(|| BoardError::UnknownTask(id.clone()))?;
        if status != TaskStatus::Submitted {
            return Err(BoardError::NotSubmitted {
                task_id: id.clone(),
                status,
            });
        }
        let verification = self.gateway.ai_verify(id, session.address()).await?;
        info!(task_id = %id, verdict = ?verification.verdict, "proof reviewed");
        Ok(verification)
    }

    fn cached_escrow(&self) -> Option<EscrowInfo> {
        self.escrow
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns escrow details, cached once a configured escrow is seen.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Gateway`] when the service cannot be reached.
    pub async fn escrow_info(&self) -> BoardResult<EscrowInfo> {
        if let Some(cached) = self.cached_escrow() {
            return Ok(cached);
        }
        let info = self.gateway.escrow_info().await?;
        if info.configured {
            *self.escrow.write().unwrap_or_else(PoisonError::into_inner) = Some(info.clone());
        }
        Ok(info)
    }

    /// Reads the connected wallet's ledger balance.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotConnected`], [`BoardError::NoLedger`], or
    /// the ledger failure.
    pub async fn wallet_balance(&self, session: &WalletSession) -> BoardResult<Amount> {
        let address = require_address(session)?;
        let funding = self.funding.as_ref().ok_or(BoardError::NoLedger)?;
        Ok(funding.ledger().balance(address).await?)
    }
}
