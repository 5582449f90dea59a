//! Trait definitions for the transcoder module.

use async_trait::async_trait;
use std::path::Path;

use super::error::TranscodeError;
use super::types::{FileOutcome, ProbeVerdict};

/// A transcoder that turns arbitrary audio sources into MP3 files.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Validates that the external tooling is present and the output
    /// directory accepts writes. Called once per run, before any file
    /// is touched; an error here is fatal to the whole run.
    async fn validate(&self, output_dir: &Path) -> Result<(), TranscodeError>;

    /// Probes a source file and decides whether it is worth encoding.
    ///
    /// Never fails: every problem with the file degrades to a
    /// [`ProbeVerdict::Rejected`] carrying the reason.
    async fn probe(&self, path: &Path) -> ProbeVerdict;

    /// Converts one source file to MP3 at `output`.
    ///
    /// Short-circuits without invoking the encoder when the destination
    /// already exists (and `overwrite` is false) or when the probe
    /// rejects the source. Never leaves a partial file behind and never
    /// propagates an error: the returned [`FileOutcome`] is the whole
    /// story.
    async fn transcode(&self, input: &Path, output: &Path, overwrite: bool) -> FileOutcome;

    /// Re-checks a produced file: present, above the minimal byte floor,
    /// and decodable end to end.
    async fn verify(&self, path: &Path) -> bool;
}
