//! Shared fixtures and a controllable gateway for task tests.

use crate::session::WalletSession;
use crate::task::{
    adapters::memory::InMemoryTaskGateway,
    domain::{
        AiVerification, Amount, DisputeReason, EscrowInfo, PersistedTaskData, ProofUrl, Task,
        TaskId, TaskStatus, Verdict, WalletAddress,
    },
    ports::{CreateTaskCommand, GatewayMode, TaskGateway, TaskGatewayError, TaskGatewayResult},
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

pub(super) const CREATOR: &str = "CREATORADDR";
pub(super) const WORKER: &str = "WORKERADDR";
pub(super) const OTHER_WORKER: &str = "OTHERWORKERADDR";
pub(super) const ESCROW: &str = "ESCROWADDR";

pub(super) fn address(value: &str) -> WalletAddress {
    WalletAddress::new(value).expect("test address should be valid")
}

pub(super) fn session_for(value: &str) -> WalletSession {
    WalletSession::connected(address(value))
}

pub(super) fn task_in(
    id: &str,
    status: TaskStatus,
    creator: &str,
    worker: Option<&str>,
    whole_algo: u64,
) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(id),
        title: format!("Task {id}"),
        description: "Translate the landing page".to_owned(),
        amount: Amount::from_whole(whole_algo),
        creator: address(creator),
        worker: worker.map(address),
        status,
        proof_url: matches!(status, TaskStatus::Submitted | TaskStatus::Completed)
            .then(|| ProofUrl::new("https://proof.example/work").expect("valid proof")),
        deadline: None,
        dispute: None,
        created_at: None,
        tx_id: None,
    })
}

pub(super) fn open_task(id: &str) -> Task {
    task_in(id, TaskStatus::Open, CREATOR, None, 5)
}

/// Gateway wrapping the in-memory store with scripted failures and a gate
/// that holds mutating calls until permits are added.
pub(super) struct ControlledGateway {
    inner: InMemoryTaskGateway,
    mode: GatewayMode,
    gate: Option<Arc<Semaphore>>,
    failure: Mutex<Option<TaskGatewayError>>,
    calls: AtomicUsize,
    escrow: EscrowInfo,
    created: Mutex<Vec<CreateTaskCommand>>,
}

impl ControlledGateway {
    pub(super) fn new(tasks: Vec<Task>) -> Self {
        Self {
            inner: InMemoryTaskGateway::seeded(tasks),
            mode: GatewayMode::Fixture,
            gate: None,
            failure: Mutex::new(None),
            calls: AtomicUsize::new(0),
            escrow: EscrowInfo::unconfigured(),
            created: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn remote(mut self) -> Self {
        self.mode = GatewayMode::Remote;
        self
    }

    pub(super) fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(super) fn with_escrow(mut self, escrow: EscrowInfo) -> Self {
        self.escrow = escrow;
        self
    }

    pub(super) fn inner(&self) -> &InMemoryTaskGateway {
        &self.inner
    }

    pub(super) fn fail_next(&self, error: TaskGatewayError) {
        *self.failure.lock().expect("failure lock") = Some(error);
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn created(&self) -> Vec<CreateTaskCommand> {
        self.created.lock().expect("created lock").clone()
    }

    async fn enter(&self) -> TaskGatewayResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate should stay open").forget();
        }
        match self.failure.lock().expect("failure lock").take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

pub(super) fn configured_escrow() -> EscrowInfo {
    EscrowInfo {
        address: Some(address(ESCROW)),
        balance: Some(Amount::from_whole(100)),
        fee_percent: 2.5,
        configured: true,
    }
}

#[async_trait]
impl TaskGateway for ControlledGateway {
    fn mode(&self) -> GatewayMode {
        self.mode
    }

    async fn list_tasks(&self, caller: Option<&WalletAddress>) -> TaskGatewayResult<Vec<Task>> {
        self.inner.list_tasks(caller).await
    }

    async fn get_task(
        &self,
        id: &TaskId,
        caller: Option<&WalletAddress>,
    ) -> TaskGatewayResult<Task> {
        self.inner.get_task(id, caller).await
    }

    async fn create_task(&self, command: &CreateTaskCommand) -> TaskGatewayResult<Task> {
        self.enter().await?;
        self.created
            .lock()
            .expect("created lock")
            .push(command.clone());
        self.inner.create_task(command).await
    }

    async fn claim(&self, id: &TaskId, worker: &WalletAddress) -> TaskGatewayResult<Task> {
        self.enter().await?;
        self.inner.claim(id, worker).await
    }

    async fn submit_proof(
        &self,
        id: &TaskId,
        caller: &WalletAddress,
        proof_url: &ProofUrl,
        ai_verify: bool,
    ) -> TaskGatewayResult<Task> {
        self.enter().await?;
        self.inner.submit_proof(id, caller, proof_url, ai_verify).await
    }

    async fn approve(&self, id: &TaskId, caller: &WalletAddress) -> TaskGatewayResult<Task> {
        self.enter().await?;
        self.inner.approve(id, caller).await
    }

    async fn cancel(&self, id: &TaskId, caller: &WalletAddress) -> TaskGatewayResult<Task> {
        self.enter().await?;
        self.inner.cancel(id, caller).await
    }

    async fn dispute(
        &self,
        id: &TaskId,
        caller: &WalletAddress,
        reason: &DisputeReason,
    ) -> TaskGatewayResult<Task> {
        self.enter().await?;
        self.inner.dispute(id, caller, reason).await
    }

    async fn ai_verify(
        &self,
        id: &TaskId,
        _caller: Option<&WalletAddress>,
    ) -> TaskGatewayResult<AiVerification> {
        self.enter().await?;
        Ok(AiVerification {
            task_id: id.clone(),
            verdict: Verdict::Pass,
            score: 0.92,
            reasoning: Some("Proof matches the description".to_owned()),
            report: None,
        })
    }

    async fn escrow_info(&self) -> TaskGatewayResult<EscrowInfo> {
        Ok(self.escrow.clone())
    }
}
