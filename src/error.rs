// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scan of {root} failed: {message}")]
    Scan { root: PathBuf, message: String },

    #[error("Change source {location} failed: {message}")]
    Source { location: String, message: String },

    #[error("Failed to load prompt template {path}: {source}")]
    TemplateLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Remote store write failed: {0}")]
    RemotePersist(String),

    #[error("Local fallback write to {path} failed: {source}")]
    LocalFallback {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid storage key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Whole-run failures; everything else is recorded against a single item.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PipelineError::Config(_)
                | PipelineError::Scan { .. }
                | PipelineError::Source { .. }
                | PipelineError::TemplateLoad { .. }
        )
    }
}
