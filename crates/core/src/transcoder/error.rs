//! Error types for the transcoder module.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort a run before any file is processed.
///
/// Per-file problems never surface here; they are folded into a
/// [`FileOutcome`](super::FileOutcome) instead.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// FFmpeg binary not found.
    #[error("ffmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// FFprobe binary not found.
    #[error("ffprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// The installed ffmpeg has no MP3 encoder compiled in.
    #[error("ffmpeg build has no libmp3lame encoder")]
    Mp3EncoderMissing,

    /// Output directory rejected a test write.
    #[error("output directory is not writable: {path}")]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while talking to the external tools.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
