//! Loads fixture tasks from a JSON file of task records.

use super::wire::{TaskRecord, decode_tasks};
use crate::fs_utils::open_parent_dir;
use crate::task::domain::Task;
use crate::task::ports::TaskGatewayError;
use camino::Utf8Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors raised while loading a fixture file.
#[derive(Debug, Clone, Error)]
pub enum FixtureError {
    /// The file could not be read.
    #[error("failed to read fixture {path}: {source}")]
    Read {
        /// Fixture location.
        path: String,
        /// Underlying I/O failure.
        source: Arc<std::io::Error>,
    },

    /// The file is not a JSON array of task records.
    #[error("failed to parse fixture {path}: {message}")]
    Parse {
        /// Fixture location.
        path: String,
        /// Parser message.
        message: String,
    },

    /// A record could not be converted into a task.
    #[error("invalid task in fixture {path}: {source}")]
    Record {
        /// Fixture location.
        path: String,
        /// Decoding failure.
        source: TaskGatewayError,
    },
}

/// Parses fixture tasks from JSON text in the task service wire format.
///
/// # Errors
///
/// Returns [`FixtureError::Parse`] or [`FixtureError::Record`] when the text
/// is not a valid array of task records.
pub fn parse_fixture_tasks(origin: &str, contents: &str) -> Result<Vec<Task>, FixtureError> {
    let records: Vec<TaskRecord> =
        serde_json::from_str(contents).map_err(|err| FixtureError::Parse {
            path: origin.to_owned(),
            message: err.to_string(),
        })?;
    decode_tasks(records).map_err(|source| FixtureError::Record {
        path: origin.to_owned(),
        source,
    })
}

/// Reads fixture tasks from `path`.
///
/// # Errors
///
/// Returns [`FixtureError`] when the file cannot be read or decoded.
pub fn load_fixture_tasks(path: &Utf8Path) -> Result<Vec<Task>, FixtureError> {
    let read_error = |source: std::io::Error| FixtureError::Read {
        path: path.to_string(),
        source: Arc::new(source),
    };
    let (dir, file_name) = open_parent_dir(path).map_err(read_error)?;
    let contents = dir.read_to_string(file_name).map_err(read_error)?;
    let tasks = parse_fixture_tasks(path.as_str(), &contents)?;
    info!(path = %path, count = tasks.len(), "loaded fixture tasks");
    Ok(tasks)
}
