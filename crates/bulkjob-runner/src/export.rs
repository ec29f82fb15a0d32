//! Upload of rendered result files
//!
//! Rendered bytes are staged in a scoped temp file and handed to the
//! configured object storage. The temp file is removed on every exit path.

use bulkjob_common::StorageDetails;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::ExportError;
use crate::storage::ObjectStorage;

/// Deterministic object key of a job's result file
pub fn object_key(object_type: &str, job_id: &str) -> String {
    format!("bulk_upload_{}_{}.csv", object_type, job_id)
}

/// Temp file prefix for `object_type`, limited to file-name-safe characters
fn temp_prefix(object_type: &str) -> String {
    object_type
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Stages rendered results and uploads them to object storage
#[derive(Clone)]
pub struct CloudExport {
    storage: Arc<dyn ObjectStorage>,
    temp_dir: Option<PathBuf>,
}

impl CloudExport {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            storage,
            temp_dir: None,
        }
    }

    /// Stage temp files under `dir` instead of the system temp dir
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Upload `rendered` under the job's object key; the container is the
    /// object type.
    #[instrument(skip(self, rendered), fields(bytes = rendered.len()))]
    pub async fn export_and_upload(
        &self,
        object_type: &str,
        job_id: &str,
        rendered: &[u8],
    ) -> Result<StorageDetails, ExportError> {
        let key = object_key(object_type, job_id);

        let mut builder = tempfile::Builder::new();
        let prefix = temp_prefix(object_type);
        builder.prefix(&prefix).suffix("upload");
        let staged = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        debug!(path = %staged.path().display(), "Staging result file");

        tokio::fs::write(staged.path(), rendered).await?;
        self.storage
            .upload(object_type, &key, staged.path())
            .await?;

        if let Err(e) = staged.close() {
            warn!(error = %e, "Failed to remove staged result file");
        }

        info!(key = %key, provider = self.storage.provider(), "Exported result file");

        Ok(StorageDetails::new(self.storage.provider(), object_type, key))
    }
}
