//! Ledger adapter speaking the algod REST API.

use crate::task::{
    domain::{Amount, TxId, WalletAddress},
    ports::{Ledger, LedgerError, SignedTransaction},
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Public testnet node used when no ledger URL is configured.
pub const DEFAULT_ALGOD_URL: &str = "https://testnet-api.algonode.cloud";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(rename = "txId")]
    tx_id: String,
}

#[derive(Debug, Deserialize)]
struct PendingTransaction {
    #[serde(rename = "confirmed-round", default)]
    confirmed_round: Option<u64>,
    #[serde(rename = "pool-error", default)]
    pool_error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccountInformation {
    amount: u64,
}

#[derive(Debug, Deserialize)]
struct AlgodErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Ledger backed by an algod node.
#[derive(Debug, Clone)]
pub struct AlgodLedger {
    client: Client,
    base_url: String,
    confirmation_polls: u32,
    poll_interval: Duration,
}

impl AlgodLedger {
    /// Creates a ledger client for the node at `base_url`.
    ///
    /// `confirmation_polls` bounds how many times a submitted transaction
    /// is checked before [`LedgerError::NotConfirmed`] is returned.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
        confirmation_polls: u32,
    ) -> Result<Self, LedgerError> {
        let mut builder = Client::builder();
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }
        let client = builder.build().map_err(LedgerError::transport)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            confirmation_polls: confirmation_polls.max(1),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Overrides the delay between confirmation polls.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn wait_for_confirmation(&self, tx_id: &TxId) -> Result<u64, LedgerError> {
        let url = self.url(&format!("/v2/transactions/pending/{tx_id}"));
        for poll in 1..=self.confirmation_polls {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(LedgerError::transport)?;
            let pending: PendingTransaction = decode(checked(response).await?).await?;
            if let Some(round) = pending.confirmed_round.filter(|round| *round > 0) {
                return Ok(round);
            }
            if let Some(detail) = pending.pool_error.filter(|text| !text.is_empty()) {
                return Err(LedgerError::Rejected {
                    status: 200,
                    detail,
                });
            }
            debug!(%tx_id, poll, "transaction still pending");
            if poll < self.confirmation_polls {
                tokio::time::sleep(self.poll_interval).await;
            }
        }
        warn!(%tx_id, polls = self.confirmation_polls, "transaction not confirmed");
        Err(LedgerError::NotConfirmed {
            tx_id: tx_id.clone(),
            polls: self.confirmation_polls,
        })
    }
}

async fn checked(response: Response) -> Result<Response, LedgerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<AlgodErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.message)
        .unwrap_or_else(|| format!("Request failed: {status}"));
    Err(LedgerError::Rejected {
        status: status.as_u16(),
        detail,
    })
}

async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, LedgerError> {
    let bytes = response.bytes().await.map_err(LedgerError::transport)?;
    serde_json::from_slice(&bytes).map_err(|err| LedgerError::Decode(err.to_string()))
}

#[async_trait]
impl Ledger for AlgodLedger {
    async fn submit(&self, signed: &SignedTransaction) -> Result<TxId, LedgerError> {
        let response = self
            .client
            .post(self.url("/v2/transactions"))
            .header(reqwest::header::CONTENT_TYPE, "application/x-binary")
            .body(signed.as_bytes().to_vec())
            .send()
            .await
            .map_err(LedgerError::transport)?;
        let submitted: SubmitResponse = decode(checked(response).await?).await?;
        let tx_id = TxId::new(submitted.tx_id);
        let round = self.wait_for_confirmation(&tx_id).await?;
        info!(%tx_id, round, "escrow deposit confirmed");
        Ok(tx_id)
    }

    async fn balance(&self, address: &WalletAddress) -> Result<Amount, LedgerError> {
        let response = self
            .client
            .get(self.url(&format!("/v2/accounts/{address}")))
            .send()
            .await
            .map_err(LedgerError::transport)?;
        let account: AccountInformation = decode(checked(response).await?).await?;
        Ok(Amount::from_micro(account.amount))
    }
}
