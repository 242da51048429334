// file: src/storage/router.rs
// description: two-tier persistence, remote object store first and local staging on failure
// reference: https://docs.rs/async-trait

use crate::models::{GeneratedArtifact, PersistenceOutcome};
use crate::storage::{LocalStaging, ObjectStore};
use std::sync::Arc;
use tracing::{debug, error, warn};

pub struct PersistenceRouter {
    remote: Arc<dyn ObjectStore>,
    local: LocalStaging,
}

impl PersistenceRouter {
    pub fn new(remote: Arc<dyn ObjectStore>, local: LocalStaging) -> Self {
        Self { remote, local }
    }

    pub fn remote_location(&self) -> String {
        self.remote.location()
    }

    pub fn local_root(&self) -> &std::path::Path {
        self.local.root()
    }

    /// The local write runs only after the remote put failed, so a body never lands in both.
    pub async fn persist(&self, artifact: GeneratedArtifact) -> PersistenceOutcome {
        let GeneratedArtifact { key, body } = artifact;

        // The body is needed again only on the fallback path.
        let remote_error = match self.remote.put(&key, body.clone()).await {
            Ok(()) => {
                debug!("Stored {} in {}", key, self.remote.location());
                return PersistenceOutcome::StoredRemote { key };
            }
            Err(e) => e.to_string(),
        };

        warn!(
            "Remote write for {} failed: {}. Falling back to {}",
            key,
            remote_error,
            self.local.root().display()
        );

        match self.local.write(&key, &body).await {
            Ok(path) => PersistenceOutcome::StoredLocalFallback { path, remote_error },
            Err(local) => {
                let local_error = local.to_string();
                error!(
                    "Fallback write for {} failed: {} (remote: {})",
                    key, local_error, remote_error
                );
                PersistenceOutcome::Failed {
                    remote_error,
                    local_error,
                }
            }
        }
    }
}
