// file: src/exporter/json.rs
// description: json export of run reports

use crate::error::Result;
use crate::models::RunReport;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_path: PathBuf,
}

impl JsonExporter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn export_report(&self, report: &RunReport, pretty: bool) -> Result<()> {
        if let Some(parent) = self.output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = if pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        fs::write(&self.output_path, json)?;

        info!(
            "Wrote run report ({} items) to {}",
            report.len(),
            self.output_path.display()
        );
        Ok(())
    }
}
