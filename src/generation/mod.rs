// file: src/generation/mod.rs
// description: text generation backend seam and module exports
// reference: internal module structure

pub mod chat;

pub use chat::ChatCompletionClient;

use crate::error::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// Prompt in, text out. Backend response shapes stay behind this trait.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
