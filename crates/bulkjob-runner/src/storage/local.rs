use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, instrument};

use super::ObjectStorage;
use crate::error::StorageError;

/// Filesystem backend laying objects out as `<root>/<container>/<key>`
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Destination of `key` in `container`, which must stay under the root
    pub fn object_path(&self, container: &str, key: &str) -> Result<PathBuf, StorageError> {
        for part in [container, key] {
            let escapes = Path::new(part)
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
            if escapes {
                return Err(StorageError::Upload {
                    key: format!("{}/{}", container, key),
                    message: format!("'{}' would leave the storage root", part),
                });
            }
        }

        Ok(self.root.join(container).join(key))
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    fn provider(&self) -> &str {
        "local"
    }

    #[instrument(skip(self, local_path))]
    async fn upload(
        &self,
        container: &str,
        key: &str,
        local_path: &Path,
    ) -> Result<(), StorageError> {
        let dest = self.object_path(container, key)?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        debug!("Copying {} to {}", local_path.display(), dest.display());

        let size = tokio::fs::copy(local_path, &dest).await?;

        info!(bytes = size, dest = %dest.display(), "Stored result file");

        Ok(())
    }
}
