// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use basebuddy::utils::logging::{format_error, format_info, format_step, format_success, format_warning};
use basebuddy::{
    Config, GitHubChangeSource, ItemStatus, JsonExporter, LocalStaging, PipelineOrchestrator,
    RunReport, StoredOutcome, Validator,
};
use chrono::{Duration as ChronoDuration, Utc};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "basebuddy")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Generate documentation for every file in a source tree with an LLM", long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and store documentation for each matching file
    Generate {
        /// Prompt template; file contents are appended to it
        #[arg(short, long, value_name = "FILE")]
        prompt: PathBuf,

        /// Only process files with this extension, e.g. `.go`
        #[arg(short, long, value_name = "EXT")]
        ext: Option<String>,

        #[arg(short, long, value_name = "DIR")]
        root: Option<PathBuf>,

        #[arg(long, value_name = "DIR")]
        fallback_dir: Option<PathBuf>,

        /// Appended to each relative path to form the artifact key
        #[arg(long, value_name = "SUFFIX")]
        suffix: Option<String>,

        #[arg(long, value_name = "NUM")]
        limit: Option<usize>,

        /// Write the run report as JSON
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        #[arg(long, action = ArgAction::SetTrue)]
        no_progress: bool,
    },

    /// Generate documentation for files changed by recent commits of a GitHub repository
    Changes {
        #[arg(short, long, value_name = "FILE")]
        prompt: PathBuf,

        #[arg(long, value_name = "OWNER")]
        owner: Option<String>,

        #[arg(long, value_name = "REPO")]
        repo: Option<String>,

        /// Only consider commits authored within this many hours
        #[arg(long, value_name = "HOURS")]
        hours: Option<u64>,

        /// Also copy each fetched source file below this directory
        #[arg(long, value_name = "DIR")]
        raw_dir: Option<PathBuf>,

        #[arg(short, long, value_name = "EXT")]
        ext: Option<String>,

        #[arg(long, value_name = "DIR")]
        fallback_dir: Option<PathBuf>,

        #[arg(long, value_name = "SUFFIX")]
        suffix: Option<String>,

        #[arg(long, value_name = "NUM")]
        limit: Option<usize>,

        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        #[arg(long, action = ArgAction::SetTrue)]
        no_progress: bool,
    },

    /// List the files a generate run would process
    Scan {
        #[arg(short, long, value_name = "EXT")]
        ext: Option<String>,

        #[arg(short, long, value_name = "DIR")]
        root: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    colored::control::set_override(cli.color);
    basebuddy::utils::logging::init_logger(cli.color, cli.verbose);

    info!("basebuddy documentation generator");

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::load(Some(path.as_path())).context("Failed to load configuration")?
        }
        None => Config::load(None).context("Failed to load configuration")?,
    };
    config.pipeline.color = cli.color;

    match cli.command {
        Commands::Generate {
            prompt,
            ext,
            root,
            fallback_dir,
            suffix,
            limit,
            report,
            no_progress,
        } => {
            if let Some(ext) = ext {
                config.pipeline.extension = Some(ext);
            }
            if let Some(root) = root {
                config.pipeline.root = root;
            }
            if let Some(dir) = fallback_dir {
                config.storage.fallback_dir = dir;
            }
            if let Some(suffix) = suffix {
                config.pipeline.artifact_suffix = suffix;
            }
            if no_progress {
                config.pipeline.show_progress = false;
            }
            config.validate().context("Invalid configuration")?;

            cmd_generate(&config, &prompt, limit, report).await?;
        }
        Commands::Changes {
            prompt,
            owner,
            repo,
            hours,
            raw_dir,
            ext,
            fallback_dir,
            suffix,
            limit,
            report,
            no_progress,
        } => {
            if owner.is_some() {
                config.changes.owner = owner;
            }
            if repo.is_some() {
                config.changes.repo = repo;
            }
            if let Some(hours) = hours {
                config.changes.window_hours = hours;
            }
            if raw_dir.is_some() {
                config.changes.raw_dir = raw_dir;
            }
            if let Some(ext) = ext {
                config.pipeline.extension = Some(ext);
            }
            if let Some(dir) = fallback_dir {
                config.storage.fallback_dir = dir;
            }
            if let Some(suffix) = suffix {
                config.pipeline.artifact_suffix = suffix;
            }
            if no_progress {
                config.pipeline.show_progress = false;
            }
            config.validate().context("Invalid configuration")?;

            cmd_changes(&config, &prompt, limit, report).await?;
        }
        Commands::Scan { ext, root } => {
            if let Some(ext) = ext {
                config.pipeline.extension = Some(ext);
            }
            if let Some(root) = root {
                config.pipeline.root = root;
            }
            config.validate().context("Invalid configuration")?;

            cmd_scan(&config).await?;
        }
    }

    Ok(())
}

async fn cmd_generate(
    config: &Config,
    prompt: &Path,
    limit: Option<usize>,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let orchestrator = PipelineOrchestrator::from_config(config, prompt)
        .await
        .inspect_err(|e| error!("{}", e))
        .context("Could not initialize pipeline")?;

    let report = orchestrator
        .run(
            &config.pipeline.root,
            config.pipeline.extension.as_deref(),
            limit,
        )
        .await
        .inspect_err(|e| error!("{}", e))
        .context("Could not scan source tree")?;

    finish_run(&report, report_path)
}

async fn cmd_changes(
    config: &Config,
    prompt: &Path,
    limit: Option<usize>,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let source = GitHubChangeSource::new(
        &config.changes,
        Duration::from_secs(config.generation.timeout_secs),
    )
    .context("Could not configure change source")?;

    let orchestrator = PipelineOrchestrator::from_config(config, prompt)
        .await
        .inspect_err(|e| error!("{}", e))
        .context("Could not initialize pipeline")?;

    let hours = i64::try_from(config.changes.window_hours).context("Invalid window_hours")?;
    let since = Utc::now() - ChronoDuration::hours(hours);
    let raw = config.changes.raw_dir.as_ref().map(LocalStaging::new);

    let report = orchestrator
        .run_changes(
            &source,
            since,
            config.pipeline.extension.as_deref(),
            raw.as_ref(),
            limit,
        )
        .await
        .inspect_err(|e| error!("{}", e))
        .context("Could not list changed files")?;

    finish_run(&report, report_path)
}

fn finish_run(report: &RunReport, report_path: Option<PathBuf>) -> Result<()> {
    print_report(report);

    if let Some(path) = report_path {
        JsonExporter::new(path)
            .export_report(report, true)
            .context("Failed to write run report")?;
    }

    if report.skipped() > 0 {
        warn!("{} file(s) skipped; see log for details", report.skipped());
    }
    info!("Documentation generation complete.");
    Ok(())
}

async fn cmd_scan(config: &Config) -> Result<()> {
    Validator::validate_directory(&config.pipeline.root).context("Invalid scan root")?;

    let files = basebuddy::pipeline::scan(
        &config.pipeline.root,
        config.pipeline.extension.as_deref(),
    )
    .await
    .context("Failed to scan directory")?;

    let total = files.len();
    for (idx, file) in files.iter().enumerate() {
        println!(
            "{}",
            format_step(idx + 1, total, &format!("{} ({} bytes)", file.relative_path, file.size))
        );
    }
    println!("{}", format_info(&format!("{} file(s) would be processed", total)));
    Ok(())
}

fn print_report(report: &RunReport) {
    println!();
    for item in &report.items {
        let line = match &item.status {
            ItemStatus::Persisted(StoredOutcome::StoredRemote { key }) => {
                format_success(&format!("{} -> remote {}", item.relative_path, key))
            }
            ItemStatus::Persisted(StoredOutcome::StoredLocalFallback { path, .. }) => {
                format_warning(&format!(
                    "{} -> local {}",
                    item.relative_path,
                    path.display()
                ))
            }
            ItemStatus::Skipped(reason) => format_error(&format!(
                "{} skipped ({}): {}",
                item.relative_path,
                reason.label(),
                Validator::truncate_text(&reason.message(), 200)
            )),
        };
        println!("{}", line);
    }

    println!(
        "\n{}",
        format_info(&format!(
            "{} stored remotely, {} stored locally, {} skipped",
            report.stored_remote(),
            report.stored_local(),
            report.skipped()
        ))
    );
}
