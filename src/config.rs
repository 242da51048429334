// file: src/config.rs
// description: application configuration management with toml and environment support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "config/default.toml";
const ENV_PREFIX: &str = "BASEBUDDY";
const LEGACY_BUCKET_VAR: &str = "S3_BUCKET";
const LEGACY_API_KEY_VAR: &str = "CHATGPT_API_KEY";
const LEGACY_GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
const MAX_WINDOW_HOURS: u64 = 24 * 365;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub storage: StorageConfig,
    pub generation: GenerationConfig,
    pub changes: ChangesConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory walked by the scanner; artifact keys are relative to it.
    pub root: PathBuf,
    /// Only files whose dotted extension equals this value are processed.
    pub extension: Option<String>,
    /// Appended to the relative path to form the artifact key.
    pub artifact_suffix: String,
    pub show_progress: bool,
    /// Colored progress bars; the CLI `--color` flag overrides it.
    pub color: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Remote bucket for generated artifacts. `None` sends everything to the fallback dir.
    pub bucket: Option<String>,
    pub region: String,
    /// Custom S3-compatible endpoint (MinIO, R2, ...).
    pub endpoint: Option<String>,
    pub force_path_style: bool,
    pub fallback_dir: PathBuf,
    pub content_type: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

/// Recently changed files of a hosted repository, used by the `changes` command.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChangesConfig {
    pub api_url: String,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub token: Option<String>,
    /// Branch or commit to read file contents from; the default branch when unset.
    pub git_ref: Option<String>,
    /// Commits authored within this many hours are considered.
    pub window_hours: u64,
    /// When set, the raw source of every fetched file is copied here as well.
    pub raw_dir: Option<PathBuf>,
}

impl Default for ChangesConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            owner: None,
            repo: None,
            token: None,
            git_ref: None,
            window_hours: 70,
            raw_dir: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extension: None,
            artifact_suffix: ".md".to_string(),
            show_progress: true,
            color: true,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            region: "us-east-1".to_string(),
            endpoint: None,
            force_path_style: false,
            fallback_dir: PathBuf::from("/tmp/data"),
            content_type: "text/markdown".to_string(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: None,
            timeout_secs: 120,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder.add_source(config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false)),
        };

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        // Variable names used by earlier deployments.
        builder = builder
            .set_override_option("storage.bucket", non_empty_env(LEGACY_BUCKET_VAR))
            .and_then(|b| {
                b.set_override_option("generation.api_key", non_empty_env(LEGACY_API_KEY_VAR))
            })
            .and_then(|b| {
                b.set_override_option("changes.token", non_empty_env(LEGACY_GITHUB_TOKEN_VAR))
            })
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.pipeline.artifact_suffix.is_empty() {
            return Err(PipelineError::Config(
                "artifact_suffix must not be empty".to_string(),
            ));
        }

        if let Some(extension) = &self.pipeline.extension {
            Validator::validate_extension_filter(extension)
                .map_err(|e| PipelineError::Config(e.to_string()))?;
        }

        if self.storage.fallback_dir.as_os_str().is_empty() {
            return Err(PipelineError::Config(
                "fallback_dir must not be empty".to_string(),
            ));
        }

        if let Some(endpoint) = &self.storage.endpoint {
            Validator::validate_url(endpoint).map_err(|e| PipelineError::Config(e.to_string()))?;
        }

        Validator::validate_url(&self.generation.base_url)
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        if self.generation.timeout_secs == 0 {
            return Err(PipelineError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Validator::validate_url(&self.changes.api_url)
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        if self.changes.window_hours == 0 || self.changes.window_hours > MAX_WINDOW_HOURS {
            return Err(PipelineError::Config(format!(
                "window_hours must be between 1 and {}",
                MAX_WINDOW_HOURS
            )));
        }

        Ok(())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
