//! Testing utilities and mock implementations.
//!
//! Provides a mock implementation of the [`Transcoder`] trait so batch
//! behavior can be tested without ffmpeg installed and without touching
//! real media files.
//!
//! [`Transcoder`]: crate::transcoder::Transcoder

mod mock_transcoder;

pub use mock_transcoder::{MockTranscoder, RecordedTranscode};
