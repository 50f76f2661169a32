//! Shared world state for task lifecycle BDD scenarios.

use std::sync::Arc;

use gigbounty::session::WalletSession;
use gigbounty::task::{
    adapters::memory::InMemoryTaskGateway,
    domain::{Task, TaskId, WalletAddress},
    services::{BoardError, TaskBoard},
};
use rstest::fixture;

/// Scenario world for task lifecycle behaviour tests.
pub struct TaskLifecycleWorld {
    pub board: TaskBoard,
    pub current_task: Option<TaskId>,
    pub last_result: Option<Result<Task, BoardError>>,
}

impl TaskLifecycleWorld {
    /// Creates a world over an empty fixture store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: TaskBoard::new(Arc::new(InMemoryTaskGateway::new())),
            current_task: None,
            last_result: None,
        }
    }

    /// Returns the task the scenario is acting on.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been posted yet.
    pub fn task_id(&self) -> Result<TaskId, eyre::Report> {
        self.current_task
            .clone()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Returns the cached copy of the current task.
    ///
    /// # Errors
    ///
    /// Returns an error when the task is missing from the board.
    pub fn task(&self) -> Result<Task, eyre::Report> {
        let id = self.task_id()?;
        self.board
            .task(&id)
            .ok_or_else(|| eyre::eyre!("task {id} missing from the board"))
    }
}

impl Default for TaskLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskLifecycleWorld {
    TaskLifecycleWorld::default()
}

/// Maps a scenario name such as `"bob"` to a wallet address.
///
/// # Errors
///
/// Returns an error when the name cannot form an address.
pub fn wallet_for(name: &str) -> Result<WalletAddress, eyre::Report> {
    WalletAddress::new(format!("{}WALLET", name.to_ascii_uppercase()))
        .map_err(|err| eyre::eyre!("invalid scenario wallet: {err}"))
}

/// Builds a connected session for a named participant.
///
/// # Errors
///
/// Returns an error when the name cannot form an address.
pub fn session_for(name: &str) -> Result<WalletSession, eyre::Report> {
    Ok(WalletSession::connected(wallet_for(name)?))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
