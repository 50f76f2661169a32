//! Shared helpers for fixture-mode integration tests.

use camino::Utf8PathBuf;
use gigbounty::task::{
    adapters::memory::InMemoryTaskGateway,
    domain::{Task, TaskDraft, WalletAddress},
    ports::{CreateTaskCommand, TaskGateway},
    services::{TaskBoard, UpdatePolicy},
};
use rstest::fixture;
use std::sync::Arc;

/// Wallet that posts tasks in these tests.
pub const POSTER: &str = "POSTERWALLETADDRESS";
/// Wallet that claims tasks in these tests.
pub const ACCEPTOR: &str = "ACCEPTORWALLETADDRESS";

/// Builds a wallet address from a known-good literal.
///
/// # Errors
///
/// Returns an error if `value` is not a valid address.
pub fn wallet(value: &str) -> eyre::Result<WalletAddress> {
    WalletAddress::new(value).map_err(|err| eyre::eyre!("invalid test wallet: {err}"))
}

/// Provides an empty fixture gateway.
#[fixture]
pub fn gateway() -> Arc<InMemoryTaskGateway> {
    Arc::new(InMemoryTaskGateway::new())
}

/// Creates an open task owned by [`POSTER`].
///
/// # Errors
///
/// Returns an error if the draft is rejected or the gateway fails.
pub async fn post(gateway: &InMemoryTaskGateway, title: &str, amount: &str) -> eyre::Result<Task> {
    let draft = TaskDraft::parse(title, "Fixture task description", amount, None)
        .map_err(|err| eyre::eyre!("draft rejected: {err}"))?;
    let command = CreateTaskCommand {
        draft,
        creator: wallet(POSTER)?,
        tx_id: None,
    };
    Ok(gateway.create_task(&command).await?)
}

/// Builds a board over `gateway` using the default update policy.
#[must_use]
pub fn board(gateway: Arc<InMemoryTaskGateway>) -> TaskBoard {
    TaskBoard::new(gateway).with_policy(UpdatePolicy::default())
}

/// Returns a unique path under the system temp directory.
///
/// # Errors
///
/// Returns an error if the temp directory is not valid UTF-8.
pub fn temp_path(name: &str) -> eyre::Result<Utf8PathBuf> {
    let unique = format!(
        "gigbounty-{}-{}-{name}",
        std::process::id(),
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    );
    Utf8PathBuf::from_path_buf(std::env::temp_dir().join(unique))
        .map_err(|path| eyre::eyre!("temp path is not UTF-8: {}", path.display()))
}
