//! Runner error types

use bulkjob_common::BulkJobError;
use thiserror::Error;

/// Result type alias for runner operations
pub type RunnerResult<T> = std::result::Result<T, RunnerError>;

/// Job- and task-store failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Object storage failures
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to upload {key}: {message}")]
    Upload { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Client-caused row failures raised while validating a task
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required column was blank; the task has already been marked FAILED
    #[error("{message}")]
    MandatoryParamsMissing { field: String, message: String },

    #[error(transparent)]
    Payload(#[from] BulkJobError),
}

/// Failures while rendering or uploading the result file
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to render result file: {0}")]
    Render(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Job-level failures
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Payload error: {0}")]
    Payload(#[from] BulkJobError),

    /// Raised by a caller-supplied strategy; displays as the raised text
    #[error(transparent)]
    Strategy(#[from] anyhow::Error),
}
