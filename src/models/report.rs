// file: src/models/report.rs
// description: per-item outcomes and the aggregate run report
// reference: https://serde.rs/enum-representations.html

use crate::pipeline::PipelineStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Result of routing one artifact through remote and local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PersistenceOutcome {
    StoredRemote {
        key: String,
    },
    StoredLocalFallback {
        path: PathBuf,
        remote_error: String,
    },
    Failed {
        remote_error: String,
        local_error: String,
    },
}

impl PersistenceOutcome {
    pub fn is_stored(&self) -> bool {
        !matches!(self, PersistenceOutcome::Failed { .. })
    }
}

/// Where a persisted artifact ended up. Only reachable through a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StoredOutcome {
    StoredRemote {
        key: String,
    },
    StoredLocalFallback {
        path: PathBuf,
        remote_error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum SkipReason {
    ReadError {
        message: String,
    },
    /// Listed as changed upstream but no longer present there.
    Removed {
        message: String,
    },
    GenerationError {
        message: String,
    },
    PersistError {
        remote_error: String,
        local_error: String,
    },
}

impl SkipReason {
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::ReadError { .. } => "read-error",
            SkipReason::Removed { .. } => "removed",
            SkipReason::GenerationError { .. } => "generation-error",
            SkipReason::PersistError { .. } => "persist-error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            SkipReason::ReadError { message }
            | SkipReason::Removed { message }
            | SkipReason::GenerationError { message } => message.clone(),
            SkipReason::PersistError {
                remote_error,
                local_error,
            } => format!("remote: {}; local: {}", remote_error, local_error),
        }
    }
}

/// Terminal state of one scanned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Persisted(StoredOutcome),
    Skipped(SkipReason),
}

impl ItemStatus {
    /// A total persistence failure ends the item as skipped, carrying both causes.
    pub fn from_outcome(outcome: PersistenceOutcome) -> Self {
        match outcome {
            PersistenceOutcome::Failed {
                remote_error,
                local_error,
            } => ItemStatus::Skipped(SkipReason::PersistError {
                remote_error,
                local_error,
            }),
            PersistenceOutcome::StoredRemote { key } => {
                ItemStatus::Persisted(StoredOutcome::StoredRemote { key })
            }
            PersistenceOutcome::StoredLocalFallback { path, remote_error } => {
                ItemStatus::Persisted(StoredOutcome::StoredLocalFallback { path, remote_error })
            }
        }
    }

    pub fn is_stored_remote(&self) -> bool {
        matches!(
            self,
            ItemStatus::Persisted(StoredOutcome::StoredRemote { .. })
        )
    }

    pub fn is_stored_local(&self) -> bool {
        matches!(
            self,
            ItemStatus::Persisted(StoredOutcome::StoredLocalFallback { .. })
        )
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            ItemStatus::Skipped(reason) => Some(reason),
            ItemStatus::Persisted(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReport {
    pub relative_path: String,
    pub key: String,
    pub status: ItemStatus,
    /// SHA-256 of the stored body; absent for skipped items.
    pub digest: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub root: PathBuf,
    pub filter: Option<String>,
    pub items: Vec<ItemReport>,
    pub stats: PipelineStats,
}

impl RunReport {
    pub fn new(root: PathBuf, filter: Option<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            root,
            filter,
            items: Vec::new(),
            stats: PipelineStats::new(),
        }
    }

    pub fn record(&mut self, item: ItemReport) {
        self.items.push(item);
    }

    pub fn finish(&mut self, stats: PipelineStats) {
        self.stats = stats;
        self.finished_at = Some(Utc::now());
    }

    pub fn status_of(&self, relative_path: &str) -> Option<&ItemStatus> {
        self.items
            .iter()
            .find(|item| item.relative_path == relative_path)
            .map(|item| &item.status)
    }

    pub fn stored_remote(&self) -> usize {
        self.items.iter().filter(|i| i.status.is_stored_remote()).count()
    }

    pub fn stored_local(&self) -> usize {
        self.items.iter().filter(|i| i.status.is_stored_local()).count()
    }

    pub fn skipped(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.status.skip_reason().is_some())
            .count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
