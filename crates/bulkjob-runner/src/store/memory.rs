//! In-memory stores for tests and snapshot replays.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, RwLock};

use bulkjob_common::{Job, Task};

use super::{JobStore, TaskStore};
use crate::error::StoreError;

#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<String, Job>>,
    writes: AtomicUsize,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a job without counting it as a write
    pub async fn insert(&self, job: Job) {
        self.jobs.write().await.insert(job.id.clone(), job);
    }

    /// Number of `update` calls served so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn read(&self, job_id: &str) -> Result<Option<Job>, StoreError> {
        Ok(self.jobs.read().await.get(job_id).cloned())
    }

    async fn update(&self, job: &Job) -> Result<(), StoreError> {
        self.jobs.write().await.insert(job.id.clone(), job.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<BTreeMap<(String, i64), Task>>,
    ranges: Mutex<Vec<(i64, i64)>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_all(&self, tasks: impl IntoIterator<Item = Task>) {
        let mut guard = self.tasks.write().await;
        for task in tasks {
            guard.insert((task.job_id.clone(), task.sequence_id), task);
        }
    }

    pub async fn get(&self, job_id: &str, sequence_id: i64) -> Option<Task> {
        self.tasks
            .read()
            .await
            .get(&(job_id.to_string(), sequence_id))
            .cloned()
    }

    pub async fn tasks_for(&self, job_id: &str) -> Vec<Task> {
        self.tasks
            .read()
            .await
            .values()
            .filter(|t| t.job_id == job_id)
            .cloned()
            .collect()
    }

    /// Sequence windows queried so far, in call order
    pub async fn queried_ranges(&self) -> Vec<(i64, i64)> {
        self.ranges.lock().await.clone()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn read_by_sequence_range(
        &self,
        job_id: &str,
        lower_exclusive: i64,
        upper_inclusive: i64,
    ) -> Result<Vec<Task>, StoreError> {
        self.ranges.lock().await.push((lower_exclusive, upper_inclusive));

        if upper_inclusive <= lower_exclusive {
            return Ok(Vec::new());
        }

        let start = (job_id.to_string(), lower_exclusive + 1);
        let end = (job_id.to_string(), upper_inclusive);

        Ok(self
            .tasks
            .read()
            .await
            .range(start..=end)
            .map(|(_, task)| task.clone())
            .collect())
    }

    async fn update_batch(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let mut guard = self.tasks.write().await;
        for task in tasks {
            guard.insert((task.job_id.clone(), task.sequence_id), task.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_range_is_half_open_then_closed() {
        let store = InMemoryTaskStore::new();
        store
            .insert_all((1..=5).map(|seq| Task::new("p-1", seq, None)))
            .await;
        store.insert_all([Task::new("p-2", 3, None)]).await;

        let tasks = store.read_by_sequence_range("p-1", 2, 4).await.unwrap();
        let seqs: Vec<i64> = tasks.iter().map(|t| t.sequence_id).collect();
        assert_eq!(seqs, vec![3, 4]);
        assert!(tasks.iter().all(|t| t.job_id == "p-1"));
    }

    #[tokio::test]
    async fn test_sparse_range_returns_empty() {
        let store = InMemoryTaskStore::new();
        store.insert_all([Task::new("p-1", 10, None)]).await;

        let tasks = store.read_by_sequence_range("p-1", 0, 5).await.unwrap();
        assert!(tasks.is_empty());
        assert_eq!(store.queried_ranges().await, vec![(0, 5)]);
    }

    #[tokio::test]
    async fn test_job_store_counts_writes() {
        let store = InMemoryJobStore::new();
        store.insert(Job::new("p-1", "user", 1)).await;
        assert_eq!(store.write_count(), 0);

        let mut job = store.read("p-1").await.unwrap().unwrap();
        job.task_count = 2;
        store.update(&job).await.unwrap();

        assert_eq!(store.write_count(), 1);
        assert_eq!(store.read("p-1").await.unwrap().unwrap().task_count, 2);
        assert!(store.read("missing").await.unwrap().is_none());
    }
}
