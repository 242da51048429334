// file: src/pipeline/orchestrator.rs
// description: coordinates scanning, prompt rendering, generation and persistence per file
// reference: https://docs.rs/tokio/latest/tokio/task/fn.spawn_blocking.html

use crate::config::{Config, PipelineConfig};
use crate::error::{PipelineError, Result};
use crate::generation::{ChatCompletionClient, TextGenerator};
use crate::models::{
    GeneratedArtifact, ItemReport, ItemStatus, RunReport, SkipReason, StoredOutcome,
};
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::repository::{FileScanner, ScannedFile};
use crate::source::ChangeSource;
use crate::storage::{LocalStaging, PersistenceRouter, remote_store_from_config};
use crate::utils::{OperationTimer, PromptTemplate};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct PipelineOrchestrator {
    template: PromptTemplate,
    generator: Arc<dyn TextGenerator>,
    router: PersistenceRouter,
    artifact_suffix: String,
    show_progress: bool,
    color: bool,
}

impl PipelineOrchestrator {
    pub fn new(
        template: PromptTemplate,
        generator: Arc<dyn TextGenerator>,
        router: PersistenceRouter,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            template,
            generator,
            router,
            artifact_suffix: config.artifact_suffix.clone(),
            show_progress: config.show_progress,
            color: config.color,
        }
    }

    /// Loads the prompt template and wires the configured backend and stores.
    ///
    /// A template that cannot be read fails the whole run.
    pub async fn from_config(config: &Config, prompt_path: &Path) -> Result<Self> {
        let template = PromptTemplate::load(prompt_path).await?;
        let generator = Arc::new(ChatCompletionClient::new(&config.generation)?);
        let remote = remote_store_from_config(&config.storage).await;
        let router = PersistenceRouter::new(remote, LocalStaging::new(&config.storage.fallback_dir));

        Ok(Self::new(template, generator, router, &config.pipeline))
    }

    pub async fn run(
        &self,
        root: &Path,
        filter: Option<&str>,
        limit: Option<usize>,
    ) -> Result<RunReport> {
        info!(
            "Generating documentation for {} (remote: {}, fallback: {})",
            root.display(),
            self.router.remote_location(),
            self.router.local_root().display()
        );

        let mut files = scan(root, filter).await?;
        if let Some(limit) = limit {
            files.truncate(limit);
        }

        if files.is_empty() {
            warn!("No files found to process");
        }

        Ok(self.process_files(root, filter, files).await)
    }

    /// Never fails: every file ends persisted or skipped in the returned report.
    pub async fn process_files(
        &self,
        root: &Path,
        filter: Option<&str>,
        files: Vec<ScannedFile>,
    ) -> RunReport {
        let timer = OperationTimer::new("generate documentation");
        let mut report = RunReport::new(root.to_path_buf(), filter.map(str::to_string));
        let progress = self.tracker(files.len());

        for file in &files {
            progress.set_message(file.relative_path.clone());
            let item = self.process_file(file, &progress).await;
            record(&mut report, &progress, item);
        }

        self.finish(report, progress, timer)
    }

    /// Documents the files changed upstream since `since`.
    ///
    /// Only the listing is fatal. With `raw` set, each fetched source is also
    /// copied under it by relative path.
    pub async fn run_changes(
        &self,
        source: &dyn ChangeSource,
        since: DateTime<Utc>,
        filter: Option<&str>,
        raw: Option<&LocalStaging>,
        limit: Option<usize>,
    ) -> Result<RunReport> {
        info!(
            "Generating documentation for changes in {} (remote: {}, fallback: {})",
            source.location(),
            self.router.remote_location(),
            self.router.local_root().display()
        );

        let scanner = FileScanner::new(filter.map(str::to_string));
        let mut paths: Vec<String> = source
            .changed_paths(since)
            .await?
            .into_iter()
            .filter(|path| scanner.matches(Path::new(path)))
            .collect();
        if let Some(limit) = limit {
            paths.truncate(limit);
        }

        if paths.is_empty() {
            warn!("No changed files to process");
        }

        let timer = OperationTimer::new("generate documentation for changes");
        let mut report = RunReport::new(
            PathBuf::from(source.location()),
            filter.map(str::to_string),
        );
        let progress = self.tracker(paths.len());

        for path in &paths {
            progress.set_message(path.clone());
            let item = self.process_change(source, path, raw, &progress).await;
            record(&mut report, &progress, item);
        }

        Ok(self.finish(report, progress, timer))
    }

    fn tracker(&self, total: usize) -> ProgressTracker {
        if self.show_progress {
            ProgressTracker::with_color(total, self.color)
        } else {
            ProgressTracker::hidden(total)
        }
    }

    fn finish(
        &self,
        mut report: RunReport,
        progress: ProgressTracker,
        timer: OperationTimer,
    ) -> RunReport {
        let mut stats = progress.get_stats();
        progress.finish();
        stats.duration_secs = timer.finish_with_count(report.len()).as_secs();

        log_final_stats(&stats);
        report.finish(stats);
        report
    }

    async fn process_file(&self, file: &ScannedFile, progress: &ProgressTracker) -> ItemReport {
        let key = GeneratedArtifact::key_for(&file.relative_path, &self.artifact_suffix);

        // Contents go to the prompt as they are; invalid UTF-8 is replaced, not rejected.
        let bytes = match tokio::fs::read(&file.path).await {
            Ok(bytes) => bytes,
            Err(source) => {
                let err = PipelineError::Read {
                    path: file.path.clone(),
                    source,
                };
                warn!("Skipping {}: {}", file.relative_path, err);
                return skipped(&file.relative_path, key, SkipReason::ReadError {
                    message: err.to_string(),
                });
            }
        };
        progress.add_bytes_processed(bytes.len() as u64);

        self.generate_and_persist(&file.relative_path, key, &String::from_utf8_lossy(&bytes))
            .await
    }

    async fn process_change(
        &self,
        source: &dyn ChangeSource,
        path: &str,
        raw: Option<&LocalStaging>,
        progress: &ProgressTracker,
    ) -> ItemReport {
        let key = GeneratedArtifact::key_for(path, &self.artifact_suffix);

        let bytes = match source.fetch(path).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                info!("Skipping {}: no longer in {}", path, source.location());
                return skipped(path, key, SkipReason::Removed {
                    message: format!("{} no longer exists in {}", path, source.location()),
                });
            }
            Err(err) => {
                warn!("Skipping {}: {}", path, err);
                return skipped(path, key, SkipReason::ReadError {
                    message: err.to_string(),
                });
            }
        };
        progress.add_bytes_processed(bytes.len() as u64);

        // The raw copy is a convenience; losing it does not affect the artifact.
        if let Some(raw) = raw {
            match raw.write(path, &bytes).await {
                Ok(copy) => debug!("Copied raw source of {} to {}", path, copy.display()),
                Err(err) => warn!("Raw copy of {} failed: {}", path, err),
            }
        }

        self.generate_and_persist(path, key, &String::from_utf8_lossy(&bytes))
            .await
    }

    async fn generate_and_persist(
        &self,
        relative_path: &str,
        key: String,
        content: &str,
    ) -> ItemReport {
        let prompt = self.template.render(content);

        let text = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!("Skipping {}: {}", relative_path, err);
                return skipped(relative_path, key, SkipReason::GenerationError {
                    message: err.to_string(),
                });
            }
        };

        let artifact = GeneratedArtifact::new(key.clone(), text.into_bytes());
        let digest = artifact.digest();

        let status = ItemStatus::from_outcome(self.router.persist(artifact).await);
        let digest = match &status {
            ItemStatus::Persisted(StoredOutcome::StoredRemote { key }) => {
                info!("Stored {} remotely as {}", relative_path, key);
                Some(digest)
            }
            ItemStatus::Persisted(StoredOutcome::StoredLocalFallback { path, .. }) => {
                info!("Stored {} locally at {}", relative_path, path.display());
                Some(digest)
            }
            ItemStatus::Skipped(reason) => {
                warn!("Skipping {}: {}", relative_path, reason.message());
                None
            }
        };

        ItemReport {
            relative_path: relative_path.to_string(),
            key,
            status,
            digest,
        }
    }
}

/// Runs the blocking directory walk off the async runtime.
pub async fn scan(root: &Path, filter: Option<&str>) -> Result<Vec<ScannedFile>> {
    let timer = OperationTimer::new("scan");
    let root_buf = root.to_path_buf();
    let scanner = FileScanner::new(filter.map(str::to_string));

    let files = tokio::task::spawn_blocking(move || scanner.scan_directory(&root_buf))
        .await
        .map_err(|e| PipelineError::Scan {
            root: root.to_path_buf(),
            message: format!("scan task failed: {}", e),
        })??;

    timer.finish_with_count(files.len());
    Ok(files)
}

fn record(report: &mut RunReport, progress: &ProgressTracker, item: ItemReport) {
    match &item.status {
        ItemStatus::Persisted(StoredOutcome::StoredRemote { .. }) => progress.inc_stored_remote(),
        ItemStatus::Persisted(StoredOutcome::StoredLocalFallback { .. }) => {
            progress.inc_stored_local()
        }
        ItemStatus::Skipped(_) => progress.inc_skipped(),
    }
    report.record(item);
}

fn skipped(relative_path: &str, key: String, reason: SkipReason) -> ItemReport {
    ItemReport {
        relative_path: relative_path.to_string(),
        key,
        status: ItemStatus::Skipped(reason),
        digest: None,
    }
}

fn log_final_stats(stats: &PipelineStats) {
    info!("=== Generation Summary ===");
    info!("Duration: {} seconds", stats.duration_secs);
    info!("Files scanned: {}", stats.files_total);
    info!("Stored remotely: {}", stats.stored_remote);
    info!("Stored in local fallback: {}", stats.stored_local);
    info!("Skipped: {}", stats.files_skipped);
    info!("Success rate: {:.2}%", stats.success_rate());
    info!(
        "Processing speed: {:.2} files/sec",
        stats.files_per_second()
    );
    info!("==========================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::MockTextGenerator;
    use crate::source::MockChangeSource;
    use crate::storage::{MemoryObjectStore, MockObjectStore, ObjectStore};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const TEMPLATE: &str = "Document this file:\n\n";

    fn pipeline_config() -> PipelineConfig {
        PipelineConfig {
            show_progress: false,
            ..PipelineConfig::default()
        }
    }

    fn echo_generator() -> MockTextGenerator {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|prompt| Ok(format!("# docs\n{}", prompt.len())));
        generator
    }

    fn orchestrator(
        generator: MockTextGenerator,
        remote: Arc<dyn ObjectStore>,
        fallback: &Path,
    ) -> PipelineOrchestrator {
        PipelineOrchestrator::new(
            PromptTemplate::new(TEMPLATE),
            Arc::new(generator),
            PersistenceRouter::new(remote, LocalStaging::new(fallback)),
            &pipeline_config(),
        )
    }

    fn source_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.go"), "package a").unwrap();
        // Listed by the scan like a file, but reading it fails with EISDIR.
        let dir = temp.path().join("vendor");
        fs::create_dir(&dir).unwrap();
        std::os::unix::fs::symlink(&dir, temp.path().join("b.go")).unwrap();
        fs::write(temp.path().join("c.go"), "package c").unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();
        temp
    }

    fn failing_remote() -> MockObjectStore {
        let mut remote = MockObjectStore::new();
        remote
            .expect_put()
            .returning(|_, _| Err(PipelineError::RemotePersist("bucket unreachable".to_string())));
        remote
            .expect_location()
            .returning(|| "s3://unreachable".to_string());
        remote
    }

    #[tokio::test]
    async fn test_unreadable_file_is_skipped_others_stored_remote() {
        let tree = source_tree();
        let staging = TempDir::new().unwrap();
        let remote = Arc::new(MemoryObjectStore::new());

        let orchestrator = orchestrator(echo_generator(), remote.clone(), staging.path());
        let report = orchestrator.run(tree.path(), Some(".go"), None).await.unwrap();

        let paths: Vec<&str> = report.items.iter().map(|i| i.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["a.go", "b.go", "c.go"]);

        assert!(report.status_of("a.go").unwrap().is_stored_remote());
        assert!(report.status_of("c.go").unwrap().is_stored_remote());
        assert_eq!(
            report.status_of("b.go").unwrap().skip_reason().unwrap().label(),
            "read-error"
        );

        assert_eq!(remote.keys(), vec!["a.go.md".to_string(), "c.go.md".to_string()]);
        let expected = format!("# docs\n{}", TEMPLATE.len() + "package a".len());
        assert_eq!(remote.get("a.go.md"), Some(expected.into_bytes()));

        assert_eq!(report.stats.stored_remote, 2);
        assert_eq!(report.stats.files_skipped, 1);
        assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_remote_outage_falls_back_to_local_staging() {
        let tree = source_tree();
        let staging = TempDir::new().unwrap();

        let orchestrator = orchestrator(echo_generator(), Arc::new(failing_remote()), staging.path());
        let report = orchestrator.run(tree.path(), Some(".go"), None).await.unwrap();

        assert!(report.status_of("a.go").unwrap().is_stored_local());
        assert!(report.status_of("c.go").unwrap().is_stored_local());
        assert_eq!(report.stored_local(), 2);
        assert_eq!(report.skipped(), 1);

        assert!(staging.path().join("a.go.md").is_file());
        assert!(staging.path().join("c.go.md").is_file());
        assert!(!staging.path().join("b.go.md").exists());
    }

    #[tokio::test]
    async fn test_generation_failure_is_isolated() {
        let tree = source_tree();
        let staging = TempDir::new().unwrap();
        let remote = Arc::new(MemoryObjectStore::new());

        let mut generator = MockTextGenerator::new();
        generator.expect_generate().returning(|prompt| {
            if prompt.ends_with("package a") {
                Err(PipelineError::Generation("429 Too Many Requests".to_string()))
            } else {
                Ok("docs".to_string())
            }
        });

        let orchestrator = orchestrator(generator, remote.clone(), staging.path());
        let report = orchestrator.run(tree.path(), Some(".go"), None).await.unwrap();

        let reason = report.status_of("a.go").unwrap().skip_reason().unwrap();
        assert_eq!(reason.label(), "generation-error");
        assert!(reason.message().contains("429"));
        assert!(report.status_of("c.go").unwrap().is_stored_remote());
        assert_eq!(remote.keys(), vec!["c.go.md".to_string()]);
    }

    #[tokio::test]
    async fn test_total_persistence_failure_is_isolated() {
        let tree = source_tree();
        let staging_parent = TempDir::new().unwrap();
        let blocker = staging_parent.path().join("staging");
        fs::write(&blocker, "file in the way").unwrap();

        let orchestrator = orchestrator(echo_generator(), Arc::new(failing_remote()), &blocker);
        let report = orchestrator.run(tree.path(), Some(".go"), None).await.unwrap();

        assert_eq!(report.len(), 3);
        for path in ["a.go", "c.go"] {
            let reason = report.status_of(path).unwrap().skip_reason().unwrap();
            assert_eq!(reason.label(), "persist-error");
            assert!(reason.message().contains("bucket unreachable"));
        }
        assert!(report.items.iter().all(|item| item.digest.is_none()));
    }

    #[tokio::test]
    async fn test_file_removed_after_scan_is_skipped() {
        let staging = TempDir::new().unwrap();
        let remote = Arc::new(MemoryObjectStore::new());
        let tree = source_tree();

        let files = vec![
            ScannedFile {
                path: tree.path().join("gone.go"),
                relative_path: "gone.go".to_string(),
                size: 0,
            },
            ScannedFile {
                path: tree.path().join("c.go"),
                relative_path: "c.go".to_string(),
                size: 9,
            },
        ];

        let orchestrator = orchestrator(echo_generator(), remote.clone(), staging.path());
        let report = orchestrator.process_files(tree.path(), Some(".go"), files).await;

        assert_eq!(report.skipped(), 1);
        assert_eq!(report.stored_remote(), 1);
        assert_eq!(report.stats.total_bytes_processed, 9);
    }

    #[tokio::test]
    async fn test_empty_content_still_generates() {
        let tree = TempDir::new().unwrap();
        fs::write(tree.path().join("empty.go"), "").unwrap();
        let staging = TempDir::new().unwrap();
        let remote = Arc::new(MemoryObjectStore::new());

        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|prompt| prompt == TEMPLATE)
            .times(1)
            .returning(|_| Ok("empty".to_string()));

        let orchestrator = orchestrator(generator, remote.clone(), staging.path());
        let report = orchestrator.run(tree.path(), Some(".go"), None).await.unwrap();

        assert!(report.status_of("empty.go").unwrap().is_stored_remote());
        assert_eq!(remote.get("empty.go.md"), Some(b"empty".to_vec()));
    }

    #[tokio::test]
    async fn test_limit_caps_processed_files() {
        let tree = source_tree();
        let staging = TempDir::new().unwrap();
        let remote = Arc::new(MemoryObjectStore::new());

        let orchestrator = orchestrator(echo_generator(), remote.clone(), staging.path());
        let report = orchestrator.run(tree.path(), Some(".go"), Some(1)).await.unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(remote.keys(), vec!["a.go.md".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_root_is_fatal() {
        let staging = TempDir::new().unwrap();
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().never();

        let orchestrator = orchestrator(
            generator,
            Arc::new(MemoryObjectStore::new()),
            staging.path(),
        );
        let err = orchestrator
            .run(&PathBuf::from("/definitely/not/here"), Some(".go"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Scan { .. }));
    }

    #[tokio::test]
    async fn test_from_config_fails_on_missing_template() {
        let temp = TempDir::new().unwrap();
        let config = Config::default_config();

        let result =
            PipelineOrchestrator::from_config(&config, &temp.path().join("missing-prompt.txt"))
                .await;
        assert!(matches!(result, Err(PipelineError::TemplateLoad { .. })));
    }

    #[tokio::test]
    async fn test_distinct_paths_keep_distinct_keys() {
        let tree = TempDir::new().unwrap();
        fs::write(tree.path().join(" a.go"), "LEADING").unwrap();
        fs::write(tree.path().join("a.go"), "PLAIN").unwrap();
        let staging = TempDir::new().unwrap();
        let remote = Arc::new(MemoryObjectStore::new());

        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|prompt| Ok(prompt.trim_start_matches(TEMPLATE).to_string()));

        let orchestrator = orchestrator(generator, remote.clone(), staging.path());
        let report = orchestrator.run(tree.path(), Some(".go"), None).await.unwrap();

        let keys: Vec<&str> = report.items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec![" a.go.md", "a.go.md"]);
        assert_eq!(remote.len(), 2);
        assert_eq!(remote.get(" a.go.md"), Some(b"LEADING".to_vec()));
        assert_eq!(remote.get("a.go.md"), Some(b"PLAIN".to_vec()));
    }

    #[tokio::test]
    async fn test_non_utf8_source_is_still_documented() {
        let tree = TempDir::new().unwrap();
        fs::write(tree.path().join("legacy.c"), b"/* caf\xe9 */ int main(){}").unwrap();
        let staging = TempDir::new().unwrap();
        let remote = Arc::new(MemoryObjectStore::new());

        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|prompt| prompt.ends_with("/* caf\u{fffd} */ int main(){}"))
            .times(1)
            .returning(|_| Ok("legacy docs".to_string()));

        let orchestrator = orchestrator(generator, remote.clone(), staging.path());
        let report = orchestrator.run(tree.path(), Some(".c"), None).await.unwrap();

        assert!(report.status_of("legacy.c").unwrap().is_stored_remote());
        assert_eq!(remote.get("legacy.c.md"), Some(b"legacy docs".to_vec()));
        assert_eq!(report.stats.total_bytes_processed, 23);
    }

    #[test]
    fn test_progress_follows_color_setting() {
        let staging = TempDir::new().unwrap();
        let build = |color: bool| {
            PipelineOrchestrator::new(
                PromptTemplate::new(TEMPLATE),
                Arc::new(MockTextGenerator::new()),
                PersistenceRouter::new(
                    Arc::new(MemoryObjectStore::new()),
                    LocalStaging::new(staging.path()),
                ),
                &PipelineConfig {
                    show_progress: true,
                    color,
                    ..PipelineConfig::default()
                },
            )
        };

        assert!(!build(false).tracker(1).is_colored());
        assert!(build(true).tracker(1).is_colored());
    }

    fn change_source() -> MockChangeSource {
        let mut source = MockChangeSource::new();
        source.expect_changed_paths().returning(|_| {
            Ok(vec![
                "README.md".to_string(),
                "cmd/api/main.go".to_string(),
                "internal/gone.go".to_string(),
                "internal/store.go".to_string(),
            ])
        });
        source.expect_fetch().returning(|path| match path {
            "cmd/api/main.go" => Ok(Some(b"package main".to_vec())),
            "internal/store.go" => Err(PipelineError::Source {
                location: "github.com/acme/findings".to_string(),
                message: "502 Bad Gateway".to_string(),
            }),
            _ => Ok(None),
        });
        source
            .expect_location()
            .returning(|| "github.com/acme/findings".to_string());
        source
    }

    #[tokio::test]
    async fn test_changes_are_documented_with_raw_copies() {
        let staging = TempDir::new().unwrap();
        let raw_root = TempDir::new().unwrap();
        let raw = LocalStaging::new(raw_root.path().join("raw_files"));
        let remote = Arc::new(MemoryObjectStore::new());

        let orchestrator = orchestrator(echo_generator(), remote.clone(), staging.path());
        let report = orchestrator
            .run_changes(&change_source(), Utc::now(), Some(".go"), Some(&raw), None)
            .await
            .unwrap();

        let paths: Vec<&str> = report.items.iter().map(|i| i.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["cmd/api/main.go", "internal/gone.go", "internal/store.go"]);
        assert_eq!(report.root, PathBuf::from("github.com/acme/findings"));

        assert!(report.status_of("cmd/api/main.go").unwrap().is_stored_remote());
        assert_eq!(remote.keys(), vec!["cmd/api/main.go.md".to_string()]);
        assert_eq!(
            fs::read(raw_root.path().join("raw_files/cmd/api/main.go")).unwrap(),
            b"package main".to_vec()
        );

        let gone = report.status_of("internal/gone.go").unwrap().skip_reason().unwrap();
        assert_eq!(gone.label(), "removed");
        let failed = report.status_of("internal/store.go").unwrap().skip_reason().unwrap();
        assert_eq!(failed.label(), "read-error");
        assert!(failed.message().contains("502"));
        assert!(!raw_root.path().join("raw_files/internal").exists());
    }

    #[tokio::test]
    async fn test_changes_listing_failure_is_fatal() {
        let staging = TempDir::new().unwrap();
        let mut source = MockChangeSource::new();
        source.expect_changed_paths().returning(|_| {
            Err(PipelineError::Source {
                location: "github.com/acme/findings".to_string(),
                message: "401 Unauthorized".to_string(),
            })
        });
        source.expect_fetch().never();
        source
            .expect_location()
            .returning(|| "github.com/acme/findings".to_string());

        let mut generator = MockTextGenerator::new();
        generator.expect_generate().never();

        let orchestrator = orchestrator(
            generator,
            Arc::new(MemoryObjectStore::new()),
            staging.path(),
        );
        let err = orchestrator
            .run_changes(&source, Utc::now(), None, None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Source { .. }));
    }
}
