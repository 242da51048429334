// file: src/utils/validation.rs
// description: input validation for paths, filters, urls and storage keys
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::path::{Component, Path};

pub struct Validator;

impl Validator {
    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PipelineError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Filters are compared against the dotted extension, so they must carry the dot.
    pub fn validate_extension_filter(filter: &str) -> Result<()> {
        if !filter.starts_with('.') {
            return Err(PipelineError::Validation(format!(
                "Extension filter must start with '.': {}",
                filter
            )));
        }

        if filter.contains('/') || filter.contains('\\') {
            return Err(PipelineError::Validation(format!(
                "Extension filter must not contain path separators: {}",
                filter
            )));
        }

        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PipelineError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    /// A key joined onto the staging root must stay underneath it.
    pub fn validate_relative_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(PipelineError::InvalidKey {
                key: key.to_string(),
                reason: "key is empty".to_string(),
            });
        }

        for component in Path::new(key).components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(PipelineError::InvalidKey {
                        key: key.to_string(),
                        reason: "parent directory components are not allowed".to_string(),
                    });
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(PipelineError::InvalidKey {
                        key: key.to_string(),
                        reason: "key must be relative".to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn truncate_text(text: &str, max_length: usize) -> String {
        if text.len() <= max_length {
            return text.to_string();
        }

        let mut end = max_length;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}
