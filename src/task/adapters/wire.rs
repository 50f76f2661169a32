//! JSON wire models shared by the HTTP gateway and fixture loading.

use crate::task::domain::{
    AiVerification, Amount, Dispute, DisputeReason, EscrowInfo, PersistedTaskData, ProofUrl,
    Task, TaskId, TaskStatus, TxId, Verdict, WalletAddress,
};
use crate::task::ports::TaskGatewayError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Task as exchanged with the task service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub amount: Amount,
    pub creator_wallet: String,
    #[serde(default)]
    pub worker_wallet: Option<String>,
    pub status: String,
    #[serde(default)]
    pub proof_url: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub dispute_reason: Option<String>,
    #[serde(default)]
    pub disputed_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub tx_id: Option<String>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskGatewayError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let status = TaskStatus::try_from(record.status.as_str())
            .map_err(|err| TaskGatewayError::Decode(err.to_string()))?;
        let creator = decode_address(&record.creator_wallet)?;
        let worker = non_empty(record.worker_wallet)
            .map(|value| decode_address(&value))
            .transpose()?;
        let proof_url = non_empty(record.proof_url).and_then(|value| ProofUrl::new(value).ok());
        let dispute = decode_dispute(record.disputed_by, record.dispute_reason)?;

        Ok(Self::from_persisted(PersistedTaskData {
            id: TaskId::new(record.id),
            title: record.title,
            description: record.description,
            amount: record.amount,
            creator,
            worker,
            status,
            proof_url,
            deadline: record.deadline.as_deref().and_then(parse_deadline),
            dispute,
            created_at: record.created_at.as_deref().and_then(parse_timestamp),
            tx_id: non_empty(record.tx_id).map(TxId::new),
        }))
    }
}

/// Decodes a list of task records, failing on the first malformed entry.
pub fn decode_tasks(records: Vec<TaskRecord>) -> Result<Vec<Task>, TaskGatewayError> {
    records.into_iter().map(Task::try_from).collect()
}

fn decode_address(value: &str) -> Result<WalletAddress, TaskGatewayError> {
    WalletAddress::new(value).map_err(|err| TaskGatewayError::Decode(err.to_string()))
}

fn decode_dispute(
    disputed_by: Option<String>,
    reason: Option<String>,
) -> Result<Option<Dispute>, TaskGatewayError> {
    let (Some(raw_address), Some(raw_reason)) = (non_empty(disputed_by), non_empty(reason)) else {
        return Ok(None);
    };
    // The service may accept reasons shorter than the client-side minimum.
    Ok(Some(Dispute {
        raised_by: decode_address(&raw_address)?,
        reason: DisputeReason::from_service(raw_reason),
    }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|inner| !inner.trim().is_empty())
}

fn parse_deadline(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(trimmed).map(|timestamp| timestamp.date_naive()))
        .or_else(|| {
            warn!(deadline = trimmed, "ignoring unparseable task deadline");
            None
        })
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Body of `POST /task/create`.
#[derive(Debug, Serialize)]
pub struct CreateTaskBody<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub amount: Amount,
    pub deadline: Option<String>,
    pub creator_wallet: &'a str,
    pub tx_id: Option<&'a str>,
}

/// Body of `POST /task/claim`.
#[derive(Debug, Serialize)]
pub struct ClaimBody<'a> {
    pub task_id: &'a str,
    pub worker_wallet: &'a str,
}

/// Body of `POST /task/submit-proof`.
#[derive(Debug, Serialize)]
pub struct SubmitProofBody<'a> {
    pub task_id: &'a str,
    pub proof_url: &'a str,
    pub ai_verify: bool,
}

/// Body of requests naming only a task (approve, AI verify).
#[derive(Debug, Serialize)]
pub struct TaskIdBody<'a> {
    pub task_id: &'a str,
}

/// Body of `POST /task/cancel`.
#[derive(Debug, Serialize)]
pub struct CancelBody<'a> {
    pub task_id: &'a str,
    pub caller_wallet: &'a str,
}

/// Body of `POST /task/dispute`.
#[derive(Debug, Serialize)]
pub struct DisputeBody<'a> {
    pub task_id: &'a str,
    pub caller_wallet: &'a str,
    pub reason: &'a str,
}

/// Response of `POST /task/ai-verify`.
#[derive(Debug, Deserialize)]
pub struct AiVerifyResponse {
    pub task_id: Option<String>,
    pub ai_result: AiResultRecord,
    #[serde(default)]
    pub audit_report: Option<String>,
}

/// Verdict payload nested in [`AiVerifyResponse`].
#[derive(Debug, Deserialize)]
pub struct AiResultRecord {
    #[serde(default)]
    pub score: f64,
    pub verdict: Verdict,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub audit_report: Option<String>,
}

impl AiVerifyResponse {
    /// Converts the response for the requested task.
    pub fn into_verification(self, requested: &TaskId) -> AiVerification {
        let task_id = self.task_id.map_or_else(|| requested.clone(), TaskId::new);
        AiVerification {
            task_id,
            verdict: self.ai_result.verdict,
            score: self.ai_result.score,
            reasoning: self.ai_result.reasoning,
            report: self.ai_result.audit_report.or(self.audit_report),
        }
    }
}

/// Response of `GET /escrow/info`.
#[derive(Debug, Deserialize)]
pub struct EscrowInfoRecord {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub balance: Option<Amount>,
    #[serde(default)]
    pub fee_percent: f64,
    #[serde(default)]
    pub configured: bool,
}

impl From<EscrowInfoRecord> for EscrowInfo {
    fn from(record: EscrowInfoRecord) -> Self {
        Self {
            address: non_empty(record.address).and_then(|value| WalletAddress::new(value).ok()),
            balance: record.balance,
            fee_percent: record.fee_percent,
            configured: record.configured,
        }
    }
}

/// Error body returned by the task service.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Returns the human-readable detail, if one was provided.
    pub fn message(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(text) => Some(text),
            other => Some(other.to_string()),
        }
    }
}
