//! Types for the transcoder module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Technical description of the first audio stream of a source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioStreamInfo {
    /// File path.
    pub path: PathBuf,
    /// Codec of the first audio stream (e.g. "flac", "mp3").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    /// Bitrate in kbps, when the container reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_kbps: Option<u32>,
    /// Sample rate in Hz.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate_hz: Option<u32>,
    /// Channel count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
    /// Duration in seconds, stream-level preferred over container-level.
    pub duration_secs: f64,
    /// Number of audio streams in the container.
    pub stream_count: usize,
}

/// Why a source file was rejected without ever invoking the encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// The container has no audio stream at all.
    NoAudioStream,
    /// Measured duration is below the configured minimum.
    TooShort { duration_secs: f64 },
    /// Probing failed or produced output we could not interpret.
    Unreadable { detail: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAudioStream => write!(f, "no audio stream"),
            Self::TooShort { duration_secs } => {
                write!(f, "audio too short ({duration_secs}s)")
            }
            Self::Unreadable { detail } => write!(f, "probe failed: {detail}"),
        }
    }
}

/// Verdict of probing a source file.
#[derive(Debug, Clone)]
pub enum ProbeVerdict {
    /// The file carries a usable audio stream.
    Usable(AudioStreamInfo),
    /// The file must not be handed to the encoder.
    Rejected(RejectReason),
}

/// Why a conversion attempt failed after the encoder was invoked.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureKind {
    /// The encoder exited with a non-zero status.
    ExitStatus { code: Option<i32>, stderr: String },
    /// The encoder ran past the configured timeout and was killed.
    Timeout { timeout_secs: u64 },
    /// The encoder reported success but the output failed verification.
    CorruptOutput,
    /// Spawning or talking to the encoder failed.
    Io { detail: String },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExitStatus { code, stderr } => {
                match code {
                    Some(code) => write!(f, "encoder exited with code {code}")?,
                    None => write!(f, "encoder was terminated by a signal")?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr.trim_end())?;
                }
                Ok(())
            }
            Self::Timeout { timeout_secs } => {
                write!(f, "encoder timed out after {timeout_secs}s")
            }
            Self::CorruptOutput => write!(f, "converted file failed validation"),
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
        }
    }
}

/// Terminal status of one source file. Every file a run visits resolves
/// to exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Converted, verified, and present at the destination.
    Converted,
    /// Destination already exists and overwriting is disabled.
    SkippedExisting,
    /// The source was rejected by the probe; the encoder never ran.
    SkippedUnusable(RejectReason),
    /// The encoder ran (or failed to run) and no output remains.
    Failed(FailureKind),
}
