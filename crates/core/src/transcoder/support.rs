//! MP3 encoder availability detection.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// MP3 encoders detected in the local ffmpeg build.
///
/// ffmpeg can be compiled without LAME, in which case `-c:a libmp3lame`
/// fails on every single file.
#[derive(Debug, Clone, Default)]
pub struct EncoderSupport {
    /// LAME MP3 encoder available.
    pub libmp3lame: bool,
    /// Fixed-point Shine MP3 encoder available.
    pub libshine: bool,
}

impl EncoderSupport {
    /// Detect available encoders by probing `ffmpeg -encoders`.
    pub async fn detect(ffmpeg_path: &Path) -> Self {
        let output = Command::new(ffmpeg_path)
            .args(["-encoders"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await;

        let stdout = match output {
            Ok(o) if o.status.success() => String::from_utf8_lossy(&o.stdout).to_string(),
            _ => return Self::default(),
        };

        Self::from_encoder_list(&stdout)
    }

    /// Parses the `-encoders` listing.
    pub fn from_encoder_list(listing: &str) -> Self {
        Self {
            libmp3lame: listing.contains("libmp3lame"),
            libshine: listing.contains("libshine"),
        }
    }

    /// Whether the build can produce MP3 with the arguments we use.
    pub fn can_encode_mp3(&self) -> bool {
        self.libmp3lame
    }
}
