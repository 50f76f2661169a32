//! HTTP/JSON gateway to the remote task service.

use super::super::wire::{
    AiVerifyResponse, CancelBody, ClaimBody, CreateTaskBody, DisputeBody, ErrorBody,
    EscrowInfoRecord, SubmitProofBody, TaskIdBody, TaskRecord, decode_tasks,
};
use crate::task::{
    domain::{AiVerification, DisputeReason, EscrowInfo, ProofUrl, Task, TaskId, WalletAddress},
    ports::{CreateTaskCommand, GatewayMode, TaskGateway, TaskGatewayError, TaskGatewayResult},
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Header attributing a request to the connected wallet.
pub const WALLET_HEADER: &str = "X-Wallet-Address";

/// Task gateway backed by the remote task service.
#[derive(Debug, Clone)]
pub struct HttpTaskGateway {
    client: Client,
    base_url: String,
}

impl HttpTaskGateway {
    /// Creates a gateway for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGatewayError::Transport`] when the HTTP client cannot
    /// be constructed.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> TaskGatewayResult<Self> {
        let mut builder = Client::builder();
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }
        let client = builder.build().map_err(TaskGatewayError::transport)?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates a gateway reusing an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Returns the service root URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        caller: Option<&WalletAddress>,
    ) -> TaskGatewayResult<T> {
        let attributed = match caller {
            Some(address) => request.header(WALLET_HEADER, address.as_str()),
            None => request,
        };
        let response = attributed.send().await.map_err(TaskGatewayError::transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(rejection(status, &body));
        }
        let bytes = response.bytes().await.map_err(TaskGatewayError::transport)?;
        serde_json::from_slice(&bytes).map_err(|err| TaskGatewayError::Decode(err.to_string()))
    }

    async fn send_task(
        &self,
        request: RequestBuilder,
        caller: Option<&WalletAddress>,
    ) -> TaskGatewayResult<Task> {
        let record: TaskRecord = self.send(request, caller).await?;
        Task::try_from(record)
    }
}

fn rejection(status: StatusCode, body: &str) -> TaskGatewayError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::message)
        .unwrap_or_else(|| format!("Request failed: {status}"));
    warn!(status = status.as_u16(), %detail, "task service rejected request");
    TaskGatewayError::Rejected {
        status: status.as_u16(),
        detail,
    }
}

#[async_trait]
impl TaskGateway for HttpTaskGateway {
    fn mode(&self) -> GatewayMode {
        GatewayMode::Remote
    }

    async fn list_tasks(&self, caller: Option<&WalletAddress>) -> TaskGatewayResult<Vec<Task>> {
        let records: Vec<TaskRecord> = self.send(self.client.get(self.url("/tasks")), caller).await?;
        debug!(count = records.len(), "fetched tasks");
        decode_tasks(records)
    }

    async fn get_task(
        &self,
        id: &TaskId,
        caller: Option<&WalletAddress>,
    ) -> TaskGatewayResult<Task> {
        let request = self.client.get(self.url(&format!("/tasks/{id}")));
        match self.send_task(request, caller).await {
            Err(TaskGatewayError::Rejected { status, .. })
                if status == StatusCode::NOT_FOUND.as_u16() =>
            {
                Err(TaskGatewayError::NotFound(id.clone()))
            }
            other => other,
        }
    }

    async fn create_task(&self, command: &CreateTaskCommand) -> TaskGatewayResult<Task> {
        let body = CreateTaskBody {
            title: command.draft.title(),
            description: command.draft.description(),
            amount: command.draft.amount(),
            deadline: command
                .draft
                .deadline()
                .map(|date| date.format("%Y-%m-%d").to_string()),
            creator_wallet: command.creator.as_str(),
            tx_id: command.tx_id.as_ref().map(|tx_id| tx_id.as_str()),
        };
        let request = self.client.post(self.url("/task/create")).json(&body);
        self.send_task(request, Some(&command.creator)).await
    }

    async fn claim(&self, id: &TaskId, worker: &WalletAddress) -> TaskGatewayResult<Task> {
        let body = ClaimBody {
            task_id: id.as_str(),
            worker_wallet: worker.as_str(),
        };
        let request = self.client.post(self.url("/task/claim")).json(&body);
        self.send_task(request, Some(worker)).await
    }

    async fn submit_proof(
        &self,
        id: &TaskId,
        caller: &WalletAddress,
        proof_url: &ProofUrl,
        ai_verify: bool,
    ) -> TaskGatewayResult<Task> {
        let body = SubmitProofBody {
            task_id: id.as_str(),
            proof_url: proof_url.as_str(),
            ai_verify,
        };
        let request = self.client.post(self.url("/task/submit-proof")).json(&body);
        self.send_task(request, Some(caller)).await
    }

    async fn approve(&self, id: &TaskId, caller: &WalletAddress) -> TaskGatewayResult<Task> {
        let body = TaskIdBody {
            task_id: id.as_str(),
        };
        let request = self.client.post(self.url("/task/approve")).json(&body);
        self.send_task(request, Some(caller)).await
    }

    async fn cancel(&self, id: &TaskId, caller: &WalletAddress) -> TaskGatewayResult<Task> {
        let body = CancelBody {
            task_id: id.as_str(),
            caller_wallet: caller.as_str(),
        };
        let request = self.client.post(self.url("/task/cancel")).json(&body);
        self.send_task(request, Some(caller)).await
    }

    async fn dispute(
        &self,
        id: &TaskId,
        caller: &WalletAddress,
        reason: &DisputeReason,
    ) -> TaskGatewayResult<Task> {
        let body = DisputeBody {
            task_id: id.as_str(),
            caller_wallet: caller.as_str(),
            reason: reason.as_str(),
        };
        let request = self.client.post(self.url("/task/dispute")).json(&body);
        self.send_task(request, Some(caller)).await
    }

    async fn ai_verify(
        &self,
        id: &TaskId,
        caller: Option<&WalletAddress>,
    ) -> TaskGatewayResult<AiVerification> {
        let body = TaskIdBody {
            task_id: id.as_str(),
        };
        let request = self.client.post(self.url("/task/ai-verify")).json(&body);
        let response: AiVerifyResponse = self.send(request, caller).await?;
        Ok(response.into_verification(id))
    }

    async fn escrow_info(&self) -> TaskGatewayResult<EscrowInfo> {
        let record: EscrowInfoRecord = self
            .send(self.client.get(self.url("/escrow/info")), None)
            .await?;
        Ok(record.into())
    }
}
