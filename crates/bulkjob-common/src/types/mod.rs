//! Common types used across the bulk job crates

use serde::{Deserialize, Serialize};

mod job;
mod task;

pub use job::{Job, StorageDetails};
pub use task::Task;

/// One row's columns as stored in a task payload.
///
/// Keys are internal field names; values keep whatever JSON type the
/// submitter's upload produced.
pub type RowPayload = serde_json::Map<String, serde_json::Value>;

/// Well-known keys and literals of task payloads and result files.
pub mod keys {
    /// Payload key naming the operation performed on the row.
    pub const OPERATION: &str = "operation";
    /// Payload key holding the row's failure message.
    pub const ERROR_MSG: &str = "error_msg";

    /// Operation tag for rows that created a record.
    pub const CREATE: &str = "create";
    /// Operation tag for rows that updated a record.
    pub const UPDATE: &str = "update";

    /// Synthetic result-file column carrying the row outcome.
    pub const STATUS_COLUMN: &str = "status";
    /// Synthetic result-file column carrying the failure message.
    pub const ERROR_COLUMN: &str = "error";

    pub const SUCCESS: &str = "Success";
    pub const FAILED: &str = "Failed";
}

/// Processing status shared by jobs and their tasks.
///
/// Variants are declared in integer-code order, so the derived ordering
/// matches the persisted codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    #[default]
    New,
    InProgress,
    Completed,
    Failed,
    Interrupt,
}

impl ProcessStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ProcessStatus::New => "new",
            ProcessStatus::InProgress => "in_progress",
            ProcessStatus::Completed => "completed",
            ProcessStatus::Failed => "failed",
            ProcessStatus::Interrupt => "interrupt",
        }
    }

    /// Integer code used by stores that persist the status numerically
    pub fn code(&self) -> i32 {
        match self {
            ProcessStatus::New => 0,
            ProcessStatus::InProgress => 1,
            ProcessStatus::Completed => 2,
            ProcessStatus::Failed => 3,
            ProcessStatus::Interrupt => 4,
        }
    }

    /// COMPLETED and FAILED; a task in either state is not processed again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessStatus::Completed | ProcessStatus::Failed)
    }
}

impl TryFrom<i32> for ProcessStatus {
    type Error = crate::BulkJobError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ProcessStatus::New),
            1 => Ok(ProcessStatus::InProgress),
            2 => Ok(ProcessStatus::Completed),
            3 => Ok(ProcessStatus::Failed),
            4 => Ok(ProcessStatus::Interrupt),
            other => Err(crate::BulkJobError::InvalidStatus(other)),
        }
    }
}

impl std::fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_ordered() {
        let all = [
            ProcessStatus::New,
            ProcessStatus::InProgress,
            ProcessStatus::Completed,
            ProcessStatus::Failed,
            ProcessStatus::Interrupt,
        ];

        for pair in all.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].code() < pair[1].code());
        }
        for status in all {
            assert_eq!(ProcessStatus::try_from(status.code()).unwrap(), status);
        }
    }

    #[test]
    fn test_invalid_status_code() {
        assert!(matches!(
            ProcessStatus::try_from(9),
            Err(crate::BulkJobError::InvalidStatus(9))
        ));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ProcessStatus::Completed.is_terminal());
        assert!(ProcessStatus::Failed.is_terminal());
        assert!(!ProcessStatus::New.is_terminal());
        assert!(!ProcessStatus::InProgress.is_terminal());
        assert!(!ProcessStatus::Interrupt.is_terminal());
    }

    #[test]
    fn test_status_serde_names() {
        let json = serde_json::to_string(&ProcessStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let status: ProcessStatus = serde_json::from_str("\"interrupt\"").unwrap();
        assert_eq!(status, ProcessStatus::Interrupt);
    }
}
