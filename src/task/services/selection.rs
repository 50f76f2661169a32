//! Startup choice between the remote service and fixture mode.

use super::ErrorKind;
use crate::task::{
    adapters::{
        fixture::{FixtureError, load_fixture_tasks},
        memory::InMemoryTaskGateway,
    },
    ports::{TaskGateway, TaskGatewayError},
};
use camino::Utf8PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// What to serve when the remote service is unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureFallback {
    /// Fail instead of falling back.
    Disabled,
    /// Fall back to an empty local store.
    Empty,
    /// Fall back to a local store seeded from a JSON file.
    File(Utf8PathBuf),
}

/// Failure to choose a gateway.
#[derive(Debug, Clone, Error)]
pub enum SelectionError {
    /// The remote service failed and fallback is disabled or not applicable.
    #[error(transparent)]
    Remote(#[from] TaskGatewayError),
    /// The fixture file could not be loaded.
    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

/// Probes `remote` once and decides which gateway serves the process.
///
/// Only transport-class failures trigger the fallback; the choice is not
/// revisited afterwards.
///
/// # Errors
///
/// Returns [`SelectionError`] when the probe fails without an applicable
/// fallback or the fixture file is unusable.
pub async fn select_gateway(
    remote: Arc<dyn TaskGateway>,
    fallback: &FixtureFallback,
) -> Result<Arc<dyn TaskGateway>, SelectionError> {
    let error = match remote.list_tasks(None).await {
        Ok(tasks) => {
            info!(count = tasks.len(), "task service reachable");
            return Ok(remote);
        }
        Err(error) => error,
    };
    if error.kind() != ErrorKind::Transport {
        return Err(error.into());
    }
    let seed = match fallback {
        FixtureFallback::Disabled => return Err(error.into()),
        FixtureFallback::Empty => Vec::new(),
        FixtureFallback::File(path) => load_fixture_tasks(path)?,
    };
    warn!(%error, seeded = seed.len(), "task service unreachable; using fixture mode");
    Ok(Arc::new(InMemoryTaskGateway::seeded(seed)))
}
