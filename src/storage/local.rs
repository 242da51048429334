// file: src/storage/local.rs
// description: local staging directory used when the remote store rejects a write
// reference: https://docs.rs/tokio/latest/tokio/fs

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LocalStaging {
    root: PathBuf,
}

impl LocalStaging {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Staging path mirroring `key` under the staging root.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        Validator::validate_relative_key(key)?;
        Ok(self.root.join(key))
    }

    /// Writes `body` to the key's path, creating missing parents first.
    pub async fn write(&self, key: &str, body: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(key)?;

        if let Some(parent) = path.parent() {
            ensure_dir(parent).await?;
        }

        fs::write(&path, body)
            .await
            .map_err(|source| PipelineError::LocalFallback {
                path: path.clone(),
                source,
            })?;

        debug!("Wrote {} bytes to {}", body.len(), path.display());
        Ok(path)
    }
}

/// `create_dir_all`; an existing directory is not an error.
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .await
        .map_err(|source| PipelineError::LocalFallback {
            path: dir.to_path_buf(),
            source,
        })
}
