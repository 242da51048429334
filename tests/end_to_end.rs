// file: tests/end_to_end.rs
// description: end-to-end generation runs against in-process backends
// reference: https://docs.rs/tokio/latest/tokio/attr.test.html

use async_trait::async_trait;
use basebuddy::{
    Config, DisabledObjectStore, LocalStaging, MemoryObjectStore, PersistenceRouter,
    PipelineError, PipelineOrchestrator, PromptTemplate, TextGenerator,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Uppercases the prompt and remembers every prompt it saw.
#[derive(Default)]
struct RecordingGenerator {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> basebuddy::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if prompt.contains("FAIL") {
            return Err(PipelineError::Generation("backend refused".to_string()));
        }
        Ok(prompt.to_uppercase())
    }
}

fn write_tree(root: &Path) {
    fs::create_dir_all(root.join("internal/service")).unwrap();
    fs::write(root.join("main.go"), "package main").unwrap();
    fs::write(root.join("internal/service/run.go"), "package service").unwrap();
    fs::write(root.join("internal/service/bad.go"), "package FAIL").unwrap();
    fs::write(root.join("go.mod"), "module basebuddy").unwrap();
}

fn orchestrator(
    generator: Arc<RecordingGenerator>,
    router: PersistenceRouter,
) -> PipelineOrchestrator {
    let mut config = Config::default_config();
    config.pipeline.show_progress = false;

    PipelineOrchestrator::new(
        PromptTemplate::new("Describe:\n"),
        generator,
        router,
        &config.pipeline,
    )
}

#[tokio::test]
async fn generates_nested_keys_in_remote_store() {
    let tree = TempDir::new().unwrap();
    let staging = TempDir::new().unwrap();
    write_tree(tree.path());

    let generator = Arc::new(RecordingGenerator::default());
    let remote = Arc::new(MemoryObjectStore::new());
    let router = PersistenceRouter::new(remote.clone(), LocalStaging::new(staging.path()));

    let report = orchestrator(generator.clone(), router)
        .run(tree.path(), Some(".go"), None)
        .await
        .unwrap();

    assert_eq!(
        remote.keys(),
        vec![
            "internal/service/run.go.md".to_string(),
            "main.go.md".to_string(),
        ]
    );
    assert_eq!(
        remote.get("main.go.md"),
        Some(b"DESCRIBE:\nPACKAGE MAIN".to_vec())
    );

    let reason = report
        .status_of("internal/service/bad.go")
        .and_then(|s| s.skip_reason())
        .unwrap();
    assert_eq!(reason.label(), "generation-error");

    // go.mod never reaches the backend.
    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 3);
    assert!(prompts.iter().all(|p| p.starts_with("Describe:\n")));
}

#[tokio::test]
async fn disabled_remote_mirrors_keys_under_staging_root() {
    let tree = TempDir::new().unwrap();
    let staging = TempDir::new().unwrap();
    write_tree(tree.path());

    let router = PersistenceRouter::new(
        Arc::new(DisabledObjectStore::new("no bucket configured")),
        LocalStaging::new(staging.path().join("data")),
    );

    let report = orchestrator(Arc::new(RecordingGenerator::default()), router)
        .run(tree.path(), Some(".go"), None)
        .await
        .unwrap();

    assert_eq!(report.stored_local(), 2);
    assert_eq!(report.stored_remote(), 0);
    assert_eq!(report.skipped(), 1);

    let stored = fs::read(staging.path().join("data/internal/service/run.go.md")).unwrap();
    assert_eq!(stored, b"DESCRIBE:\nPACKAGE SERVICE".to_vec());

    let item = report
        .items
        .iter()
        .find(|i| i.relative_path == "main.go")
        .unwrap();
    assert_eq!(item.key, "main.go.md");
    assert!(item.digest.is_some());
}

#[tokio::test]
async fn unfiltered_run_processes_every_file() {
    let tree = TempDir::new().unwrap();
    let staging = TempDir::new().unwrap();
    write_tree(tree.path());

    let remote = Arc::new(MemoryObjectStore::new());
    let router = PersistenceRouter::new(remote.clone(), LocalStaging::new(staging.path()));

    let report = orchestrator(Arc::new(RecordingGenerator::default()), router)
        .run(tree.path(), None, None)
        .await
        .unwrap();

    assert_eq!(report.len(), 4);
    assert!(remote.get("go.mod.md").is_some());
    assert_eq!(report.stats.files_total, 4);
}
