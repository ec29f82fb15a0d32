//! Job and task store contracts
//!
//! Persistence is owned by the caller. The runner reads one job record,
//! pages through its tasks by sequence number and writes both back; every
//! write is a whole-record upsert, last writer wins.

use async_trait::async_trait;
use bulkjob_common::{Job, Task};

use crate::error::StoreError;

pub mod memory;

pub use memory::{InMemoryJobStore, InMemoryTaskStore};

/// Store of bulk upload job records
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Read a job by id; `None` when the id is unknown
    async fn read(&self, job_id: &str) -> Result<Option<Job>, StoreError>;

    /// Upsert a job record by id
    async fn update(&self, job: &Job) -> Result<(), StoreError>;
}

/// Store of the per-row tasks of a job
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks of `job_id` with `lower_exclusive < sequence_id <= upper_inclusive`,
    /// ordered by sequence id. Sparse ranges return fewer rows, possibly none.
    async fn read_by_sequence_range(
        &self,
        job_id: &str,
        lower_exclusive: i64,
        upper_inclusive: i64,
    ) -> Result<Vec<Task>, StoreError>;

    /// Persist the given tasks
    async fn update_batch(&self, tasks: &[Task]) -> Result<(), StoreError>;
}
