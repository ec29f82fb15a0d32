use async_trait::async_trait;
use aws_sdk_s3::{
    config::{Credentials, Region},
    error::DisplayErrorContext,
    primitives::ByteStream,
    Client,
};
use std::path::Path;
use tracing::{debug, info, instrument};

use super::config::S3Config;
use super::ObjectStorage;
use crate::error::StorageError;

/// S3-compatible backend. Containers become key prefixes inside one bucket.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    pub async fn new(config: S3Config) -> Result<Self, StorageError> {
        debug!(
            endpoint = ?config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            path_style = config.path_style,
            "Initializing S3 storage"
        );

        if config.bucket.is_empty() {
            return Err(StorageError::Config("S3 bucket cannot be empty".to_string()));
        }

        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "bulkjob-storage",
        );

        let mut s3_config_builder = aws_sdk_s3::Config::builder()
            .credentials_provider(credentials)
            .region(Region::new(config.region.clone()))
            .force_path_style(config.path_style);

        if let Some(endpoint) = &config.endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(s3_config_builder.build());

        info!("S3 storage initialized for bucket: {}", config.bucket);

        Ok(Self {
            client,
            bucket: config.bucket,
        })
    }

    pub fn build_key(&self, container: &str, key: &str) -> String {
        format!("{}/{}", container, key)
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    fn provider(&self) -> &str {
        "s3"
    }

    #[instrument(skip(self, local_path))]
    async fn upload(
        &self,
        container: &str,
        key: &str,
        local_path: &Path,
    ) -> Result<(), StorageError> {
        let object_key = self.build_key(container, key);
        let data = tokio::fs::read(local_path).await?;
        let checksum = calculate_sha256(&data);
        let size = data.len();

        debug!("Uploading {} bytes to s3://{}/{}", size, self.bucket, object_key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .content_type("text/csv")
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: object_key.clone(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        info!(
            checksum = %checksum,
            "Successfully uploaded to s3://{}/{}", self.bucket, object_key
        );

        Ok(())
    }
}

fn calculate_sha256(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
