// file: src/source/mod.rs
// description: remote change sources feeding the `changes` command
// reference: internal module structure

pub mod github;

pub use github::GitHubChangeSource;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[cfg(test)]
use mockall::automock;

/// Files touched by recent commits of a hosted repository.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChangeSource: Send + Sync {
    /// Paths changed by commits authored after `since`, deduplicated and sorted.
    async fn changed_paths(&self, since: DateTime<Utc>) -> Result<Vec<String>>;

    /// Current bytes of `path`, or `None` when it no longer exists upstream.
    async fn fetch(&self, path: &str) -> Result<Option<Vec<u8>>>;

    /// Human readable location, e.g. `github.com/owner/repo`.
    fn location(&self) -> String;
}
