//! Job runner: the status state machine around one job invocation
//!
//! 1. Load the job; unknown ids are logged and ignored.
//! 2. Completed jobs that are not flagged interrupted are re-affirmed as
//!    COMPLETED without running the strategy.
//! 3. Otherwise the strategy runs. Any error it returns marks the job
//!    FAILED with the error text and ends the invocation.
//! 4. On success the job is marked COMPLETED and persisted.

use async_trait::async_trait;
use bulkjob_common::{Job, ProcessStatus};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::batch::BatchProcessor;
use crate::error::RunnerResult;
use crate::handler::BulkJobHandler;
use crate::store::JobStore;

/// Row-processing strategy applied to a loaded job
#[async_trait]
pub trait JobStrategy: Send + Sync {
    async fn process_job(&self, job: &mut Job) -> RunnerResult<()>;
}

/// Runs a handler through the batch processor
pub struct HandlerStrategy<'a, H: ?Sized> {
    processor: &'a BatchProcessor,
    handler: &'a H,
}

impl<'a, H: BulkJobHandler + ?Sized> HandlerStrategy<'a, H> {
    pub fn new(processor: &'a BatchProcessor, handler: &'a H) -> Self {
        Self { processor, handler }
    }
}

#[async_trait]
impl<'a, H: BulkJobHandler + ?Sized> JobStrategy for HandlerStrategy<'a, H> {
    async fn process_job(&self, job: &mut Job) -> RunnerResult<()> {
        self.processor.process_batches(job, self.handler).await?;
        Ok(())
    }
}

/// How an invocation of [`JobRunner::run`] ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No job with the given id
    NotFound,
    /// Job was already completed; status re-persisted, nothing processed
    AlreadyCompleted,
    Completed,
    /// Job-level failure; the message is stored on the job
    Failed { message: String },
}

/// Drives one job from its stored state to a terminal status
#[derive(Clone)]
pub struct JobRunner {
    job_store: Arc<dyn JobStore>,
}

impl JobRunner {
    pub fn new(job_store: Arc<dyn JobStore>) -> Self {
        Self { job_store }
    }

    #[instrument(skip(self, strategy))]
    pub async fn run(&self, job_id: &str, strategy: &dyn JobStrategy) -> RunnerResult<RunOutcome> {
        info!("Bulk upload background job called");

        let Some(mut job) = self.job_store.read(job_id).await? else {
            info!("Invalid process id, no job found");
            return Ok(RunOutcome::NotFound);
        };

        if job.is_settled() {
            info!("Job already completed, skipping reprocessing");
            job.status = ProcessStatus::Completed;
            self.job_store.update(&job).await?;
            return Ok(RunOutcome::AlreadyCompleted);
        }

        job.started_at = Some(Utc::now());

        if let Err(e) = strategy.process_job(&mut job).await {
            let message = e.to_string();
            error!(error = %message, "Bulk upload job failed");

            job.mark_failed(message.clone());
            self.job_store.update(&job).await?;
            return Ok(RunOutcome::Failed { message });
        }

        job.mark_completed();
        self.job_store.update(&job).await?;

        info!("Bulk upload job completed");
        Ok(RunOutcome::Completed)
    }

    /// Run `handler` over the job's tasks through `processor`
    pub async fn run_with_handler<H: BulkJobHandler + ?Sized>(
        &self,
        job_id: &str,
        processor: &BatchProcessor,
        handler: &H,
    ) -> RunnerResult<RunOutcome> {
        self.run(job_id, &HandlerStrategy::new(processor, handler))
            .await
    }
}
