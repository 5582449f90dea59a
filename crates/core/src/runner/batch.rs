//! Batch runner driving every source file through the transcoder.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::transcoder::{FailureKind, FileOutcome, Transcoder};

use super::scan::{collect_sources, output_path_for};
use super::types::RunSummary;

/// Errors that abort a batch run before any file is processed.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Source folder does not exist.
    #[error("source folder does not exist: {path}")]
    SourceDirMissing { path: PathBuf },

    /// I/O error preparing the run.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Walks the source tree and converts every file, one outcome per file.
pub struct BatchRunner<T: Transcoder> {
    run: RunConfig,
    transcoder: Arc<T>,
}

impl<T: Transcoder + 'static> BatchRunner<T> {
    /// Creates a runner over the given configuration and transcoder.
    pub fn new(run: RunConfig, transcoder: T) -> Self {
        Self {
            run,
            transcoder: Arc::new(transcoder),
        }
    }

    /// Runs the whole batch and returns the aggregate counters.
    ///
    /// Per-file problems never abort the traversal; only a missing
    /// source folder or an unpreparable output root do. Conversions run
    /// through a semaphore sized by `max_parallel`, so the default of 1
    /// processes files strictly one at a time.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let start = Instant::now();

        if !self.run.source_dir.is_dir() {
            return Err(RunnerError::SourceDirMissing {
                path: self.run.source_dir.clone(),
            });
        }
        tokio::fs::create_dir_all(&self.run.output_dir).await?;

        let sources = collect_sources(&self.run.source_dir);
        info!(
            "Converting {} file(s): {} -> {}",
            sources.len(),
            self.run.source_dir.display(),
            self.run.output_dir.display()
        );

        // A permit count of zero would stall the run forever.
        let semaphore = Arc::new(Semaphore::new(self.run.max_parallel.max(1)));
        let mut handles = Vec::with_capacity(sources.len());

        for input in sources {
            let output = output_path_for(
                &self.run.source_dir,
                &self.run.output_dir,
                &input,
                self.run.mirror_tree,
            );
            let overwrite = self.run.overwrite;
            let transcoder = Arc::clone(&self.transcoder);
            let semaphore = Arc::clone(&semaphore);
            let input_label = input.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore is never closed");
                let outcome = transcoder.transcode(&input, &output, overwrite).await;
                report(&input, &output, &outcome);
                outcome
            });
            handles.push((input_label, handle));
        }

        // One record per completed task; the counters are only touched here.
        let mut summary = RunSummary::default();
        for (input, handle) in handles {
            match handle.await {
                Ok(outcome) => summary.record(&outcome),
                Err(e) => {
                    warn!("[fail] {}: conversion task aborted: {}", input.display(), e);
                    summary.record(&FileOutcome::Failed(FailureKind::Io {
                        detail: format!("task aborted: {e}"),
                    }));
                }
            }
        }
        summary.duration_ms = start.elapsed().as_millis() as u64;

        Ok(summary)
    }
}

fn report(input: &Path, output: &Path, outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Converted => {
            info!("[ok] {} -> {}", input.display(), output.display());
        }
        FileOutcome::SkippedExisting => {
            info!("[skip] {}: destination exists", input.display());
        }
        FileOutcome::SkippedUnusable(reason) => {
            info!("[skip] {}: {}", input.display(), reason);
        }
        FileOutcome::Failed(kind) => {
            warn!("[fail] {}: {}", input.display(), kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTranscoder;
    use crate::transcoder::RejectReason;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    fn run_config(source: &Path, output: &Path) -> RunConfig {
        RunConfig {
            source_dir: source.to_path_buf(),
            output_dir: output.to_path_buf(),
            overwrite: false,
            max_parallel: 1,
            mirror_tree: true,
        }
    }

    #[tokio::test]
    async fn test_missing_source_dir_is_fatal() {
        let temp = TempDir::new().unwrap();
        let config = run_config(&temp.path().join("nope"), &temp.path().join("out"));
        let runner = BatchRunner::new(config, MockTranscoder::new());

        let result = runner.run().await;
        assert!(matches!(result, Err(RunnerError::SourceDirMissing { .. })));
    }

    #[tokio::test]
    async fn test_empty_source_tree() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        fs::create_dir_all(&source).unwrap();
        let config = run_config(&source, &temp.path().join("out"));
        let runner = BatchRunner::new(config, MockTranscoder::new());

        let summary = runner.run().await.unwrap();
        assert_eq!(summary.total, 0);
        assert!(summary.is_balanced());
        // Output root is still created for an empty run.
        assert!(temp.path().join("out").is_dir());
    }

    #[tokio::test]
    async fn test_every_file_lands_in_one_bucket() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        touch(&source.join("song.wav"));
        touch(&source.join("clip.wav"));
        touch(&source.join("broken.wav"));

        let transcoder = MockTranscoder::new();
        transcoder
            .set_outcome(
                source.join("clip.wav"),
                FileOutcome::SkippedUnusable(RejectReason::TooShort { duration_secs: 0.5 }),
            )
            .await;
        transcoder
            .set_outcome(
                source.join("broken.wav"),
                FileOutcome::Failed(FailureKind::ExitStatus {
                    code: Some(1),
                    stderr: "Invalid data".to_string(),
                }),
            )
            .await;

        let config = run_config(&source, &temp.path().join("out"));
        let runner = BatchRunner::new(config, transcoder);
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.is_balanced());
    }

    #[tokio::test]
    async fn test_mirrored_destinations() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        let output = temp.path().join("out");
        touch(&source.join("albums/live/song.wav"));

        let transcoder = MockTranscoder::new();
        let config = run_config(&source, &output);
        let runner = BatchRunner::new(config, transcoder);
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.converted, 1);
        assert!(output.join("albums/live/song.mp3").is_file());
    }

    #[tokio::test]
    async fn test_flat_destinations() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        let output = temp.path().join("out");
        touch(&source.join("albums/live/song.wav"));

        let transcoder = MockTranscoder::new();
        let mut config = run_config(&source, &output);
        config.mirror_tree = false;
        let runner = BatchRunner::new(config, transcoder);
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.converted, 1);
        assert!(output.join("song.mp3").is_file());
        assert!(!output.join("albums").exists());
    }

    #[tokio::test]
    async fn test_existing_destination_is_skipped() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        let output = temp.path().join("out");
        touch(&source.join("song.wav"));
        touch(&output.join("song.mp3"));

        let transcoder = MockTranscoder::new();
        let config = run_config(&source, &output);
        let runner = BatchRunner::new(config, transcoder);
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.converted, 0);
    }

    #[tokio::test]
    async fn test_hidden_files_are_not_visited() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        touch(&source.join("song.wav"));
        touch(&source.join(".DS_Store"));
        touch(&source.join(".cache/tmp.wav"));

        let transcoder = MockTranscoder::new();
        let config = run_config(&source, &temp.path().join("out"));
        let runner = BatchRunner::new(config, transcoder);
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.total, 1);
    }

    #[tokio::test]
    async fn test_parallel_run_keeps_counters_balanced() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        for i in 0..20 {
            touch(&source.join(format!("track{i:02}.wav")));
        }

        let transcoder = MockTranscoder::new();
        let mut config = run_config(&source, &temp.path().join("out"));
        config.max_parallel = 4;
        let runner = BatchRunner::new(config, transcoder);
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.total, 20);
        assert_eq!(summary.converted, 20);
        assert!(summary.is_balanced());
    }
}
