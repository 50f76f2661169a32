//! Gateway port for the task service that owns lifecycle authority.

use crate::task::domain::{
    AiVerification, DisputeReason, EscrowInfo, ProofUrl, Task, TaskDomainError, TaskDraft, TaskId,
    TxId, WalletAddress,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task gateway operations.
pub type TaskGatewayResult<T> = Result<T, TaskGatewayError>;

/// Which implementation is serving lifecycle requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMode {
    /// Requests are forwarded to the remote task service.
    Remote,
    /// Requests mutate a local in-memory store with no persistence.
    Fixture,
}

impl GatewayMode {
    /// Returns a stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Fixture => "fixture",
        }
    }
}

/// Request to create a task on the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskCommand {
    /// Validated task content.
    pub draft: TaskDraft,
    /// Posting party.
    pub creator: WalletAddress,
    /// Escrow deposit transaction, when funds were locked on the ledger.
    pub tx_id: Option<TxId>,
}

/// Task service contract.
///
/// Every mutating call names the caller so the implementation can attribute
/// the request. Implementations return the task as the service now sees it.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// Reports which implementation this is.
    fn mode(&self) -> GatewayMode;

    /// Lists every task known to the service.
    async fn list_tasks(&self, caller: Option<&WalletAddress>) -> TaskGatewayResult<Vec<Task>>;

    /// Fetches one task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGatewayError::NotFound`] when the task does not exist.
    async fn get_task(
        &self,
        id: &TaskId,
        caller: Option<&WalletAddress>,
    ) -> TaskGatewayResult<Task>;

    /// Creates a task.
    async fn create_task(&self, command: &CreateTaskCommand) -> TaskGatewayResult<Task>;

    /// Claims a task for `worker`.
    async fn claim(&self, id: &TaskId, worker: &WalletAddress) -> TaskGatewayResult<Task>;

    /// Submits proof of work, optionally asking for automated review.
    async fn submit_proof(
        &self,
        id: &TaskId,
        caller: &WalletAddress,
        proof_url: &ProofUrl,
        ai_verify: bool,
    ) -> TaskGatewayResult<Task>;

    /// Approves submitted work and releases funds.
    async fn approve(&self, id: &TaskId, caller: &WalletAddress) -> TaskGatewayResult<Task>;

    /// Cancels an open task and refunds the escrow.
    async fn cancel(&self, id: &TaskId, caller: &WalletAddress) -> TaskGatewayResult<Task>;

    /// Raises a dispute.
    async fn dispute(
        &self,
        id: &TaskId,
        caller: &WalletAddress,
        reason: &DisputeReason,
    ) -> TaskGatewayResult<Task>;

    /// Runs automated review of a submitted proof.
    async fn ai_verify(
        &self,
        id: &TaskId,
        caller: Option<&WalletAddress>,
    ) -> TaskGatewayResult<AiVerification>;

    /// Reports escrow account details.
    async fn escrow_info(&self) -> TaskGatewayResult<EscrowInfo>;
}

/// Errors returned by task gateway implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskGatewayError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A lifecycle guard of the local store rejected the request.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The remote service rejected the request.
    #[error("request rejected with status {status}: {detail}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Service-provided explanation.
        detail: String,
    },

    /// The operation is not offered by this implementation.
    #[error("{0} is not available in this mode")]
    Unsupported(&'static str),

    /// The response could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The service could not be reached.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskGatewayError {
    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
