//! In-memory task gateway used in fixture mode and tests.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use crate::task::{
    domain::{
        AiVerification, DisputeReason, EscrowInfo, ProofUrl, Task, TaskDomainError, TaskId,
        WalletAddress,
    },
    ports::{CreateTaskCommand, GatewayMode, TaskGateway, TaskGatewayError, TaskGatewayResult},
};

/// Thread-safe in-memory task store applying lifecycle guards locally.
///
/// Nothing is persisted; the store lives as long as the process.
#[derive(Clone)]
pub struct InMemoryTaskGateway {
    state: Arc<RwLock<InMemoryTaskState>>,
    clock: Arc<dyn Clock + Send + Sync>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: Vec<Task>,
    sequence: u64,
}

impl InMemoryTaskGateway {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Creates an empty store reading time from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryTaskState::default())),
            clock,
        }
    }

    /// Creates a store holding `tasks`, in board order.
    #[must_use]
    pub fn seeded(tasks: Vec<Task>) -> Self {
        let gateway = Self::new();
        gateway
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .tasks = tasks;
        gateway
    }

    fn read_state(
        &self,
    ) -> TaskGatewayResult<std::sync::RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state
            .read()
            .map_err(|err| TaskGatewayError::transport(std::io::Error::other(err.to_string())))
    }

    fn write_state(
        &self,
    ) -> TaskGatewayResult<std::sync::RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state
            .write()
            .map_err(|err| TaskGatewayError::transport(std::io::Error::other(err.to_string())))
    }

    /// Applies `change` to a copy of the task and stores it only on success.
    fn mutate(
        &self,
        id: &TaskId,
        change: impl FnOnce(&mut Task) -> Result<(), TaskDomainError>,
    ) -> TaskGatewayResult<Task> {
        let mut state = self.write_state()?;
        let slot = state
            .tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or_else(|| TaskGatewayError::NotFound(id.clone()))?;
        let mut updated = slot.clone();
        change(&mut updated)?;
        slot.clone_from(&updated);
        debug!(task_id = %id, status = %updated.status(), "fixture task updated");
        Ok(updated)
    }
}

impl Default for InMemoryTaskGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskGateway for InMemoryTaskGateway {
    fn mode(&self) -> GatewayMode {
        GatewayMode::Fixture
    }

    async fn list_tasks(&self, _caller: Option<&WalletAddress>) -> TaskGatewayResult<Vec<Task>> {
        Ok(self.read_state()?.tasks.clone())
    }

    async fn get_task(
        &self,
        id: &TaskId,
        _caller: Option<&WalletAddress>,
    ) -> TaskGatewayResult<Task> {
        self.read_state()?
            .tasks
            .iter()
            .find(|task| task.id() == id)
            .cloned()
            .ok_or_else(|| TaskGatewayError::NotFound(id.clone()))
    }

    async fn create_task(&self, command: &CreateTaskCommand) -> TaskGatewayResult<Task> {
        let created_at = self.clock.utc();
        let mut state = self.write_state()?;
        state.sequence += 1;
        let id = TaskId::new(format!(
            "local-{}-{}",
            created_at.timestamp_millis(),
            state.sequence
        ));
        let task = Task::open(
            id,
            command.draft.clone(),
            command.creator.clone(),
            created_at,
            command.tx_id.clone(),
        );
        state.tasks.insert(0, task.clone());
        debug!(task_id = %task.id(), "fixture task created");
        Ok(task)
    }

    async fn claim(&self, id: &TaskId, worker: &WalletAddress) -> TaskGatewayResult<Task> {
        self.mutate(id, |task| task.claim(worker))
    }

    async fn submit_proof(
        &self,
        id: &TaskId,
        caller: &WalletAddress,
        proof_url: &ProofUrl,
        _ai_verify: bool,
    ) -> TaskGatewayResult<Task> {
        self.mutate(id, |task| task.submit_proof(caller, proof_url.clone()))
    }

    async fn approve(&self, id: &TaskId, caller: &WalletAddress) -> TaskGatewayResult<Task> {
        self.mutate(id, |task| task.approve(caller))
    }

    async fn cancel(&self, id: &TaskId, caller: &WalletAddress) -> TaskGatewayResult<Task> {
        self.mutate(id, |task| task.cancel(caller))
    }

    async fn dispute(
        &self,
        id: &TaskId,
        caller: &WalletAddress,
        reason: &DisputeReason,
    ) -> TaskGatewayResult<Task> {
        self.mutate(id, |task| task.raise_dispute(caller, reason.clone()))
    }

    async fn ai_verify(
        &self,
        _id: &TaskId,
        _caller: Option<&WalletAddress>,
    ) -> TaskGatewayResult<AiVerification> {
        Err(TaskGatewayError::Unsupported("AI verification"))
    }

    async fn escrow_info(&self) -> TaskGatewayResult<EscrowInfo> {
        Ok(EscrowInfo::unconfigured())
    }
}
