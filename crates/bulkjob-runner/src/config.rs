//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::storage::config::S3Config;

// ============================================================================
// Runner Configuration Constants
// ============================================================================

/// Default number of rows per sequence window; the row store's preferred
/// write-batch size.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default root directory for the local storage backend.
pub const DEFAULT_LOCAL_STORAGE_ROOT: &str = "./bulk-upload-results";

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub batch: BatchConfig,
    pub export: ExportConfig,
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub batch_size: usize,
}

/// Where result files are staged and uploaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for staging temp files; the system temp dir when unset
    pub temp_dir: Option<PathBuf>,
    pub backend: StorageBackend,
    pub local_root: PathBuf,
    pub s3: S3Config,
}

/// Object storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Local,
    S3,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "fs" => Ok(StorageBackend::Local),
            "s3" | "minio" => Ok(StorageBackend::S3),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            batch: BatchConfig {
                batch_size: std::env::var("BULKJOB_BATCH_SIZE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_BATCH_SIZE),
            },
            export: ExportConfig {
                temp_dir: std::env::var("BULKJOB_TEMP_DIR").ok().map(PathBuf::from),
                backend: match std::env::var("BULKJOB_STORAGE_BACKEND") {
                    Ok(backend) => backend.parse()?,
                    Err(_) => StorageBackend::default(),
                },
                local_root: std::env::var("BULKJOB_LOCAL_STORAGE_ROOT")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOCAL_STORAGE_ROOT)),
                s3: S3Config::from_env(),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.batch.batch_size == 0 {
            anyhow::bail!("Batch size must be greater than 0");
        }

        if self.export.backend == StorageBackend::S3 && self.export.s3.bucket.is_empty() {
            anyhow::bail!("S3 bucket cannot be empty when the s3 backend is selected");
        }

        if let Some(ref dir) = self.export.temp_dir {
            if !dir.is_dir() {
                tracing::warn!(temp_dir = %dir.display(), "Configured temp dir does not exist yet");
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch: BatchConfig {
                batch_size: DEFAULT_BATCH_SIZE,
            },
            export: ExportConfig {
                temp_dir: None,
                backend: StorageBackend::Local,
                local_root: PathBuf::from(DEFAULT_LOCAL_STORAGE_ROOT),
                s3: S3Config::default(),
            },
        }
    }
}
