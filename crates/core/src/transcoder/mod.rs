//! Transcoder module for converting audio files to MP3.
//!
//! This module provides the `Transcoder` trait and the FFmpeg-backed
//! implementation. All decoding, encoding, and format parsing is
//! delegated to the external `ffmpeg`/`ffprobe` executables; the code
//! here builds argument lists, enforces timeouts, and classifies what
//! the tools report.
//!
//! # Example
//!
//! ```ignore
//! use shellac_core::transcoder::{FfmpegTranscoder, FileOutcome, Transcoder};
//!
//! let transcoder = FfmpegTranscoder::with_defaults();
//!
//! // Fail fast when ffmpeg/ffprobe are missing or the output folder
//! // rejects writes.
//! transcoder.validate(Path::new("/music-mp3")).await?;
//!
//! let outcome = transcoder
//!     .transcode(
//!         Path::new("/music/song.flac"),
//!         Path::new("/music-mp3/song.mp3"),
//!         false,
//!     )
//!     .await;
//!
//! match outcome {
//!     FileOutcome::Converted => println!("done"),
//!     other => println!("not converted: {:?}", other),
//! }
//! ```

mod error;
mod ffmpeg;
mod support;
mod traits;
mod types;

pub use error::TranscodeError;
pub use ffmpeg::FfmpegTranscoder;
pub use support::EncoderSupport;
pub use traits::Transcoder;
pub use types::{AudioStreamInfo, FailureKind, FileOutcome, ProbeVerdict, RejectReason};
