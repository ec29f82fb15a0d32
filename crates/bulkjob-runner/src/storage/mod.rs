//! Object storage for exported result files
//!
//! The runner only needs one capability from a storage provider: put a
//! local file under a container and key. Each backend reports its own
//! provider identity, which ends up in the job's storage pointer.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::config::{ExportConfig, StorageBackend};
use crate::error::StorageError;

pub mod config;
pub mod local;
pub mod s3;

pub use local::LocalStorage;
pub use s3::S3Storage;

/// Destination for exported result files
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Provider identity recorded in storage pointers, e.g. "s3"
    fn provider(&self) -> &str;

    /// Upload the file at `local_path` as `key` inside `container`
    async fn upload(&self, container: &str, key: &str, local_path: &Path)
        -> Result<(), StorageError>;
}

/// Build the backend selected by the export configuration
pub async fn from_config(config: &ExportConfig) -> Result<Arc<dyn ObjectStorage>, StorageError> {
    let storage: Arc<dyn ObjectStorage> = match config.backend {
        StorageBackend::Local => Arc::new(LocalStorage::new(&config.local_root)),
        StorageBackend::S3 => Arc::new(S3Storage::new(config.s3.clone()).await?),
    };

    Ok(storage)
}
