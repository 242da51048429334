// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod generation;
pub mod models;
pub mod pipeline;
pub mod repository;
pub mod source;
pub mod storage;
pub mod utils;

pub use config::{ChangesConfig, Config, GenerationConfig, PipelineConfig, StorageConfig};
pub use error::{PipelineError, Result};
pub use exporter::JsonExporter;
pub use generation::{ChatCompletionClient, TextGenerator};
pub use models::{
    GeneratedArtifact, ItemReport, ItemStatus, PersistenceOutcome, RunReport, SkipReason,
    StoredOutcome,
};
pub use pipeline::{PipelineOrchestrator, PipelineStats, ProgressTracker};
pub use repository::{FileScanner, ScannedFile};
pub use source::{ChangeSource, GitHubChangeSource};
pub use storage::{
    DisabledObjectStore, LocalStaging, MemoryObjectStore, ObjectStore, PersistenceRouter,
    S3ObjectStore,
};
pub use utils::{OperationTimer, PromptTemplate, Validator};
