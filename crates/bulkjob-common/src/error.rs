//! Error types for bulk upload jobs

use thiserror::Error;

/// Result type alias for bulk job operations
pub type Result<T> = std::result::Result<T, BulkJobError>;

/// Main error type shared by the bulk job crates
#[derive(Error, Debug)]
pub enum BulkJobError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid status code: {0}")]
    InvalidStatus(i32),

    #[error("Missing payload for task {job_id}:{sequence_id}")]
    MissingPayload { job_id: String, sequence_id: i64 },
}
