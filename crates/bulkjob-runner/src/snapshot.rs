//! JSON snapshots of a job and its tasks, used to replay a job locally.

use anyhow::{Context, Result};
use bulkjob_common::{Job, RowPayload, Task};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::store::{InMemoryJobStore, InMemoryTaskStore};

/// A job record together with all of its tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub job: Job,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl JobSnapshot {
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;

        let snapshot: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

        if let Some(stray) = snapshot.tasks.iter().find(|t| t.job_id != snapshot.job.id) {
            anyhow::bail!(
                "Task {} belongs to job {}, not {}",
                stray.sequence_id,
                stray.job_id,
                snapshot.job.id
            );
        }

        Ok(snapshot)
    }

    /// Load the snapshot into fresh in-memory stores
    pub async fn seed(self, jobs: &InMemoryJobStore, tasks: &InMemoryTaskStore) {
        jobs.insert(self.job).await;
        tasks.insert_all(self.tasks).await;
    }
}

/// Aggregated rows to render without running a job
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsFile {
    #[serde(default)]
    pub success: Vec<RowPayload>,
    #[serde(default)]
    pub failure: Vec<RowPayload>,
}

impl ResultsFile {
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read results {}", path.display()))?;

        serde_json::from_str(&raw).with_context(|| format!("Failed to parse results {}", path.display()))
    }
}
