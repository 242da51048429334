// file: src/utils/template.rs
// description: prompt template loading and rendering
// reference: https://platform.openai.com/docs/guides/prompt-engineering

use crate::error::{PipelineError, Result};
use std::path::Path;
use tracing::debug;

/// Template text followed by the file content. No placeholder syntax.
pub fn build(template: &str, content: &str) -> String {
    let mut prompt = String::with_capacity(template.len() + content.len());
    prompt.push_str(template);
    prompt.push_str(content);
    prompt
}

/// Prompt prefix loaded once per run and shared by every file.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let template = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| PipelineError::TemplateLoad {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            "Loaded prompt template {} ({} bytes)",
            path.display(),
            template.len()
        );
        Ok(Self::new(template))
    }

    pub fn render(&self, content: &str) -> String {
        build(&self.template, content)
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}
