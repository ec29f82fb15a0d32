//! Job finalization: result payloads, export, terminal status.

use bulkjob_common::{codec, Job, RowPayload, StorageDetails};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::error::{ExportError, RunnerResult};
use crate::export::CloudExport;
use crate::handler::BulkJobHandler;
use crate::store::JobStore;
use crate::writer::render_results;

/// What happened to the result file of a finalized job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Uploaded(StorageDetails),
    /// Export is best effort; the job completes without a storage pointer
    Failed(String),
}

/// Summary of a finalized job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeOutcome {
    pub success_count: usize,
    pub failure_count: usize,
    pub export: ExportOutcome,
}

/// Writes aggregated results onto the job, exports them and persists the job
#[derive(Clone)]
pub struct CompletionHandler {
    job_store: Arc<dyn JobStore>,
    exporter: CloudExport,
}

impl CompletionHandler {
    pub fn new(job_store: Arc<dyn JobStore>, exporter: CloudExport) -> Self {
        Self {
            job_store,
            exporter,
        }
    }

    /// Mark `job` COMPLETED with the given results and persist it once
    ///
    /// Export failures are logged and reported in the outcome; they never
    /// change the job status.
    #[instrument(skip_all, fields(job_id = %job.id))]
    pub async fn finalize<H: BulkJobHandler + ?Sized>(
        &self,
        job: &mut Job,
        success: Vec<RowPayload>,
        failure: Vec<RowPayload>,
        handler: &H,
    ) -> RunnerResult<FinalizeOutcome> {
        info!(
            succeeded = success.len(),
            failed = failure.len(),
            "Finalizing job"
        );

        job.success_result = Some(codec::encode_rows(&success)?);
        job.failure_result = Some(codec::encode_rows(&failure)?);
        job.mark_completed();

        let export = match self.export(job, &success, &failure, handler).await {
            Ok(details) => {
                job.storage_details = Some(details.clone());
                ExportOutcome::Uploaded(details)
            },
            Err(e) => {
                error!(error = %e, "Failed to export result file");
                ExportOutcome::Failed(e.to_string())
            },
        };

        self.job_store.update(job).await?;

        Ok(FinalizeOutcome {
            success_count: success.len(),
            failure_count: failure.len(),
            export,
        })
    }

    async fn export<H: BulkJobHandler + ?Sized>(
        &self,
        job: &Job,
        success: &[RowPayload],
        failure: &[RowPayload],
        handler: &H,
    ) -> Result<StorageDetails, ExportError> {
        let columns = handler.output_columns();
        let rendered = render_results(success, failure, &columns, |row| {
            handler.pre_process_result(row)
        })?;

        self.exporter
            .export_and_upload(&job.object_type, &job.id, &rendered)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::handler::{GenericRowHandler, OutputColumns};
    use crate::storage::{LocalStorage, ObjectStorage};
    use crate::store::InMemoryJobStore;
    use async_trait::async_trait;
    use bulkjob_common::ProcessStatus;
    use serde_json::json;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    struct FailingStorage {
        staged: Mutex<Option<PathBuf>>,
    }

    #[async_trait]
    impl ObjectStorage for FailingStorage {
        fn provider(&self) -> &str {
            "failing"
        }

        async fn upload(&self, _: &str, key: &str, local_path: &Path) -> Result<(), StorageError> {
            *self.staged.lock().unwrap() = Some(local_path.to_path_buf());
            Err(StorageError::Upload {
                key: key.to_string(),
                message: "simulated outage".to_string(),
            })
        }
    }

    fn row(value: serde_json::Value) -> RowPayload {
        value.as_object().cloned().unwrap()
    }

    fn handler() -> GenericRowHandler {
        GenericRowHandler::new(OutputColumns::new(["name"]))
    }

    #[tokio::test]
    async fn test_finalize_exports_and_persists_once() {
        let root = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryJobStore::new());
        let completion = CompletionHandler::new(
            store.clone(),
            CloudExport::new(Arc::new(LocalStorage::new(root.path()))),
        );

        let mut job = Job::new("p-1", "user", 2);
        let outcome = completion
            .finalize(
                &mut job,
                vec![row(json!({"name": "Ann"}))],
                vec![row(json!({"name": "Bob", "error_msg": "bad email"}))],
                &handler(),
            )
            .await
            .unwrap();

        let details = StorageDetails::new("local", "user", "bulk_upload_user_p-1.csv");
        assert_eq!(outcome.export, ExportOutcome::Uploaded(details.clone()));
        assert_eq!((outcome.success_count, outcome.failure_count), (1, 1));
        assert_eq!(store.write_count(), 1);

        let saved = store.read("p-1").await.unwrap().unwrap();
        assert_eq!(saved.status, ProcessStatus::Completed);
        assert_eq!(saved.storage_details, Some(details));
        assert_eq!(
            codec::decode_rows(saved.success_result.as_deref().unwrap()).unwrap()[0]["name"],
            "Ann"
        );

        let csv = std::fs::read_to_string(root.path().join("user/bulk_upload_user_p-1.csv")).unwrap();
        assert_eq!(csv, "name,status,error\nAnn,Success,\nBob,Failed,bad email\n");
    }

    #[tokio::test]
    async fn test_upload_failure_still_completes_job() {
        let store = Arc::new(InMemoryJobStore::new());
        let storage = Arc::new(FailingStorage {
            staged: Mutex::new(None),
        });
        let completion = CompletionHandler::new(store.clone(), CloudExport::new(storage.clone()));

        let mut job = Job::new("p-2", "organisation", 1);
        let outcome = completion
            .finalize(&mut job, vec![row(json!({"name": "Acme"}))], vec![], &handler())
            .await
            .unwrap();

        assert!(matches!(outcome.export, ExportOutcome::Failed(ref msg) if msg.contains("simulated outage")));

        let saved = store.read("p-2").await.unwrap().unwrap();
        assert_eq!(saved.status, ProcessStatus::Completed);
        assert!(saved.storage_details.is_none());
        assert_eq!(saved.failure_result.as_deref(), Some("[]"));
        assert!(saved.success_result.as_deref().unwrap().contains("Acme"));
        assert_eq!(store.write_count(), 1);

        let staged = storage.staged.lock().unwrap().clone().unwrap();
        assert!(!staged.exists());
    }
}
