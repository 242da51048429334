// file: src/repository/scanner.rs
// description: Directory walking and file discovery with extension filtering
// reference: https://docs.rs/walkdir

use crate::error::{PipelineError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default)]
pub struct FileScanner {
    extension: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub relative_path: String,
    pub size: u64,
}

impl FileScanner {
    pub fn new(extension: Option<String>) -> Self {
        Self { extension }
    }

    /// Walks `root` and returns every file accepted by the filter, in file name order.
    ///
    /// The scan is all-or-nothing: any traversal error, on the root or on a
    /// nested entry, fails the whole scan.
    pub fn scan_directory(&self, root: &Path) -> Result<Vec<ScannedFile>> {
        info!("Scanning directory: {}", root.display());

        let root = root.canonicalize().map_err(|e| PipelineError::Scan {
            root: root.to_path_buf(),
            message: e.to_string(),
        })?;

        if !root.is_dir() {
            return Err(PipelineError::Scan {
                root,
                message: "not a directory".to_string(),
            });
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| PipelineError::Scan {
                root: root.clone(),
                message: e.to_string(),
            })?;

            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();

            if !self.matches(path) {
                debug!("Skipping file: {}", path.display());
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).map_err(|e| PipelineError::Scan {
                root: root.clone(),
                message: e.to_string(),
            })?;

            files.push(ScannedFile {
                path: path.to_path_buf(),
                relative_path: relative_path(&root, path),
                size,
            });
        }

        match &self.extension {
            Some(extension) => info!("Found {} {} files", files.len(), extension),
            None => info!("Found {} files", files.len()),
        }
        Ok(files)
    }

    pub fn matches(&self, path: &Path) -> bool {
        match &self.extension {
            None => true,
            Some(extension) => dotted_extension(path) == extension,
        }
    }
}

/// Suffix of the final path element starting at its last `.`, or `""`.
///
/// Dotfiles count as all extension: `.bashrc` yields `.bashrc`.
pub fn dotted_extension(path: &Path) -> &str {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    match name.rfind('.') {
        Some(idx) => &name[idx..],
        None => "",
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
