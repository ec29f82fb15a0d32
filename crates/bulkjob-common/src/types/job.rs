use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ProcessStatus;

/// Pointer to an exported result file in object storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDetails {
    /// Storage provider identity, e.g. "s3" or "local"
    pub provider: String,
    /// Container the object lives in; the job's object type
    pub container: String,
    /// Object key within the container
    pub key: String,
}

impl StorageDetails {
    pub fn new(
        provider: impl Into<String>,
        container: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            container: container.into(),
            key: key.into(),
        }
    }
}

/// A bulk upload job: one submitted file covering a fixed set of tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    /// Domain of the rows, e.g. "user" or "organisation"
    pub object_type: String,
    pub status: ProcessStatus,
    /// Operator flag forcing a completed job to be processed again
    #[serde(default)]
    pub interrupted: bool,
    /// Total row count, fixed when the job was created
    pub task_count: i64,
    /// JSON array of successful row payloads, written at completion
    #[serde(default)]
    pub success_result: Option<String>,
    /// JSON array of failed row payloads, or the job-level failure message
    #[serde(default)]
    pub failure_result: Option<String>,
    /// Set only when the result file was exported
    #[serde(default)]
    pub storage_details: Option<StorageDetails>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(id: impl Into<String>, object_type: impl Into<String>, task_count: i64) -> Self {
        Self {
            id: id.into(),
            object_type: object_type.into(),
            status: ProcessStatus::New,
            interrupted: false,
            task_count,
            success_result: None,
            failure_result: None,
            storage_details: None,
            started_at: None,
            completed_at: None,
        }
    }

    /// Completed jobs are not processed again unless flagged interrupted.
    pub fn is_settled(&self) -> bool {
        self.status == ProcessStatus::Completed && !self.interrupted
    }

    pub fn mark_completed(&mut self) {
        self.status = ProcessStatus::Completed;
        self.interrupted = false;
        self.completed_at = Some(Utc::now());
    }

    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.status = ProcessStatus::Failed;
        self.failure_result = Some(message.into());
        self.completed_at = Some(Utc::now());
    }
}
