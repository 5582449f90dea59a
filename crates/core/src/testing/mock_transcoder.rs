//! Mock transcoder for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::transcoder::{
    AudioStreamInfo, FileOutcome, ProbeVerdict, TranscodeError, Transcoder,
};

/// A recorded transcode call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedTranscode {
    /// Source path the runner handed in.
    pub input: PathBuf,
    /// Destination path the runner computed.
    pub output: PathBuf,
    /// Overwrite flag in effect.
    pub overwrite: bool,
}

/// Mock implementation of the `Transcoder` trait.
///
/// Behaves like the real transcoder at the seams that matter for runner
/// tests: it honors the skip-if-exists short-circuit, and a `Converted`
/// outcome really writes a small file at the destination (creating
/// parent directories). Outcomes and probe verdicts are configurable
/// per path.
#[derive(Debug, Default)]
pub struct MockTranscoder {
    /// Recorded transcode calls.
    calls: Arc<RwLock<Vec<RecordedTranscode>>>,
    /// Pre-configured outcomes by input path.
    outcomes: Arc<RwLock<HashMap<PathBuf, FileOutcome>>>,
    /// Pre-configured probe verdicts by input path.
    verdicts: Arc<RwLock<HashMap<PathBuf, ProbeVerdict>>>,
    /// If set, `validate` fails with this error.
    validate_error: Arc<RwLock<Option<TranscodeError>>>,
}

impl MockTranscoder {
    /// Create a new mock transcoder that converts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded transcode calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedTranscode> {
        self.calls.read().await.clone()
    }

    /// Get the number of transcode calls performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Set the outcome returned for a specific input path.
    pub async fn set_outcome(&self, path: impl AsRef<Path>, outcome: FileOutcome) {
        self.outcomes
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), outcome);
    }

    /// Set the probe verdict returned for a specific input path.
    pub async fn set_verdict(&self, path: impl AsRef<Path>, verdict: ProbeVerdict) {
        self.verdicts
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), verdict);
    }

    /// Make `validate` fail with the given error.
    pub async fn set_validate_error(&self, error: TranscodeError) {
        *self.validate_error.write().await = Some(error);
    }

    /// Default stream info for probing unconfigured paths.
    fn default_stream_info(path: &Path) -> AudioStreamInfo {
        AudioStreamInfo {
            path: path.to_path_buf(),
            codec: Some("flac".to_string()),
            bitrate_kbps: Some(1411),
            sample_rate_hz: Some(44100),
            channels: Some(2),
            duration_secs: 180.0,
            stream_count: 1,
        }
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn validate(&self, _output_dir: &Path) -> Result<(), TranscodeError> {
        match self.validate_error.write().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn probe(&self, path: &Path) -> ProbeVerdict {
        if let Some(verdict) = self.verdicts.read().await.get(path) {
            return verdict.clone();
        }
        ProbeVerdict::Usable(Self::default_stream_info(path))
    }

    async fn transcode(&self, input: &Path, output: &Path, overwrite: bool) -> FileOutcome {
        self.calls.write().await.push(RecordedTranscode {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            overwrite,
        });

        if output.exists() && !overwrite {
            return FileOutcome::SkippedExisting;
        }

        if let Some(outcome) = self.outcomes.read().await.get(input) {
            return outcome.clone();
        }

        if let Some(parent) = output.parent() {
            let _ = tokio::fs::create_dir_all(parent).await;
        }
        let _ = tokio::fs::write(output, b"mock mp3 payload").await;
        FileOutcome::Converted
    }

    async fn verify(&self, path: &Path) -> bool {
        path.exists()
    }
}
