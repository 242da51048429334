// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod artifact;
pub mod report;

pub use artifact::GeneratedArtifact;
pub use report::{
    ItemReport, ItemStatus, PersistenceOutcome, RunReport, SkipReason,
    StoredOutcome,
};
