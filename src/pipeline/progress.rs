// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for pipeline execution
// reference: https://docs.rs/indicatif

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub files_total: usize,
    pub stored_remote: usize,
    pub stored_local: usize,
    pub files_skipped: usize,
    pub total_bytes_processed: u64,
    pub duration_secs: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files_stored(&self) -> usize {
        self.stored_remote + self.stored_local
    }

    pub fn files_per_second(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        (self.files_stored() + self.files_skipped) as f64 / self.duration_secs as f64
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.files_stored() + self.files_skipped;
        if total == 0 {
            return 0.0;
        }
        (self.files_stored() as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    files_total: usize,
    colored: bool,
    stored_remote: AtomicUsize,
    stored_local: AtomicUsize,
    files_skipped: AtomicUsize,
    bytes_processed: AtomicU64,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn with_color(total_files: usize, colored: bool) -> Self {
        Self::build(MultiProgress::new(), total_files, colored)
    }

    /// Counts without drawing; used when progress output is disabled.
    pub fn hidden(total_files: usize) -> Self {
        Self::build(
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            total_files,
            false,
        )
    }

    fn build(multi_progress: MultiProgress, total_files: usize, colored: bool) -> Self {
        let main_bar = create_progress_bar(&multi_progress, total_files as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            files_total: total_files,
            colored,
            stored_remote: AtomicUsize::new(0),
            stored_local: AtomicUsize::new(0),
            files_skipped: AtomicUsize::new(0),
            bytes_processed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    pub fn inc_stored_remote(&self) {
        self.stored_remote.fetch_add(1, Ordering::SeqCst);
        self.advance();
    }

    pub fn inc_stored_local(&self) {
        self.stored_local.fetch_add(1, Ordering::SeqCst);
        self.advance();
    }

    pub fn inc_skipped(&self) {
        self.files_skipped.fetch_add(1, Ordering::SeqCst);
        self.advance();
    }

    pub fn add_bytes_processed(&self, bytes: u64) {
        self.bytes_processed.fetch_add(bytes, Ordering::SeqCst);
    }

    pub fn set_message(&self, message: String) {
        self.main_bar.set_message(message);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Generation complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            files_total: self.files_total,
            stored_remote: self.stored_remote.load(Ordering::SeqCst),
            stored_local: self.stored_local.load(Ordering::SeqCst),
            files_skipped: self.files_skipped.load(Ordering::SeqCst),
            total_bytes_processed: self.bytes_processed.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs(),
        }
    }

    fn advance(&self) {
        self.main_bar.inc(1);

        let message = format!(
            "Remote: {} | Local fallback: {} | Skipped: {}",
            self.stored_remote.load(Ordering::SeqCst),
            self.stored_local.load(Ordering::SeqCst),
            self.files_skipped.load(Ordering::SeqCst)
        );
        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let (template, chars) = if colored {
        (
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            "█▓▒░",
        )
    } else {
        (
            "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta}) {msg}",
            "=>-",
        )
    };

    match ProgressStyle::default_bar().template(template) {
        Ok(style) => bar.set_style(style.progress_chars(chars)),
        Err(e) => tracing::debug!("Invalid progress template, using default: {}", e),
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}
