// file: src/models/artifact.rs
// description: generated artifact keyed by the source file's relative path
// reference: https://docs.rs/sha2

use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub key: String,
    pub body: Vec<u8>,
}

impl GeneratedArtifact {
    pub fn new(key: String, body: impl Into<Vec<u8>>) -> Self {
        Self {
            key,
            body: body.into(),
        }
    }

    /// Exactly `relative_path` + `suffix`; distinct paths never share a key.
    pub fn key_for(relative_path: &str, suffix: &str) -> String {
        format!("{}{}", relative_path, suffix)
    }

    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.body);
        format!("{:x}", hasher.finalize())
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
