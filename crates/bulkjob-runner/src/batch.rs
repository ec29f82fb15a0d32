//! Paginated batch processing of a job's tasks
//!
//! Tasks are fetched in contiguous sequence windows `(lower, upper]`,
//! one window at a time. After the handler has processed a window, the
//! terminal tasks' payloads are collected into the job-level success and
//! failure lists and the window is written back.

use bulkjob_common::{codec, Job, ProcessStatus, RowPayload, Task};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use crate::completion::{CompletionHandler, FinalizeOutcome};
use crate::error::RunnerResult;
use crate::handler::BulkJobHandler;
use crate::store::TaskStore;

/// One page of sequence ids: `lower < sequence_id <= upper`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceWindow {
    pub lower: i64,
    pub upper: i64,
}

/// Contiguous, non-overlapping windows covering `(0, task_count]`
#[derive(Debug, Clone)]
pub struct SequenceWindows {
    next_lower: i64,
    task_count: i64,
    batch_size: i64,
}

impl SequenceWindows {
    pub fn new(task_count: i64, batch_size: usize) -> Self {
        Self {
            next_lower: 0,
            task_count,
            batch_size: i64::try_from(batch_size.max(1)).unwrap_or(i64::MAX),
        }
    }
}

impl Iterator for SequenceWindows {
    type Item = SequenceWindow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_lower >= self.task_count {
            return None;
        }

        let lower = self.next_lower;
        let upper = lower.saturating_add(self.batch_size).min(self.task_count);
        self.next_lower = upper;

        Some(SequenceWindow { lower, upper })
    }
}

/// Job-level results gathered across windows
#[derive(Debug, Default)]
pub struct AggregatedResults {
    pub success: Vec<RowPayload>,
    pub failure: Vec<RowPayload>,
    /// Terminal tasks whose payload could not be decoded
    pub dropped: usize,
}

impl AggregatedResults {
    /// Collect the payloads of terminal tasks, in task order
    pub fn collect(&mut self, tasks: &[Task]) {
        for task in tasks {
            let (payload, target) = match task.status {
                ProcessStatus::Failed => (&task.failure_result, &mut self.failure),
                ProcessStatus::Completed => (&task.success_result, &mut self.success),
                _ => continue,
            };

            let decoded = match payload.as_deref() {
                Some(payload) => codec::decode_row(payload),
                None => Err(bulkjob_common::BulkJobError::MissingPayload {
                    job_id: task.job_id.clone(),
                    sequence_id: task.sequence_id,
                }),
            };

            match decoded {
                Ok(row) => target.push(row),
                Err(e) => {
                    error!(
                        job_id = %task.job_id,
                        sequence = task.sequence_id,
                        error = %e,
                        "Dropping task with unreadable result payload"
                    );
                    self.dropped += 1;
                },
            }
        }
    }
}

/// Drives a job's tasks through a handler window by window
#[derive(Clone)]
pub struct BatchProcessor {
    task_store: Arc<dyn TaskStore>,
    completion: CompletionHandler,
    batch_size: usize,
}

impl BatchProcessor {
    pub fn new(task_store: Arc<dyn TaskStore>, completion: CompletionHandler, batch_size: usize) -> Self {
        Self {
            task_store,
            completion,
            batch_size: batch_size.max(1),
        }
    }

    /// Process every window of `job`, then finalize it
    ///
    /// Handler and store errors abort the remaining windows and propagate.
    #[instrument(skip_all, fields(job_id = %job.id, task_count = job.task_count))]
    pub async fn process_batches<H: BulkJobHandler + ?Sized>(
        &self,
        job: &mut Job,
        handler: &H,
    ) -> RunnerResult<FinalizeOutcome> {
        let mut results = AggregatedResults::default();

        for window in SequenceWindows::new(job.task_count, self.batch_size) {
            let mut tasks = self
                .task_store
                .read_by_sequence_range(&job.id, window.lower, window.upper)
                .await?;

            if tasks.is_empty() {
                info!(
                    lower = window.lower,
                    upper = window.upper,
                    "No tasks found in sequence window"
                );
                continue;
            }

            debug!(lower = window.lower, upper = window.upper, rows = tasks.len(), "Processing window");

            handler.process_batch(job, &mut tasks).await?;
            results.collect(&tasks);
            self.task_store.update_batch(&tasks).await?;
        }

        if results.dropped > 0 {
            info!(dropped = results.dropped, "Some tasks were left out of the job results");
        }

        self.completion
            .finalize(job, results.success, results.failure, handler)
            .await
    }
}
