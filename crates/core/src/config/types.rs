use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub run: RunConfig,
    #[serde(default)]
    pub encoding: EncodingConfig,
    #[serde(default)]
    pub ffmpeg: FfmpegConfig,
}

/// Run configuration: where to read sources, where to write MP3s.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunConfig {
    /// Root folder scanned recursively for source files.
    pub source_dir: PathBuf,
    /// Folder receiving the converted `.mp3` files.
    pub output_dir: PathBuf,
    /// Overwrite destination files that already exist.
    #[serde(default)]
    pub overwrite: bool,
    /// Maximum files converted at the same time. 1 = strictly sequential.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
    /// Mirror the source subdirectory structure under the output folder.
    /// When false, every output lands flat in `output_dir` (same-named
    /// sources in different subfolders then collide).
    #[serde(default = "default_mirror_tree")]
    pub mirror_tree: bool,
}

fn default_max_parallel() -> usize {
    1
}

fn default_mirror_tree() -> bool {
    true
}

/// Fixed encoding parameters applied to every file of a run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncodingConfig {
    /// Target bitrate, in ffmpeg notation (e.g. "192k").
    #[serde(default = "default_bitrate")]
    pub bitrate: String,
    /// Output sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Output channel count (1 = mono, 2 = stereo).
    #[serde(default = "default_channels")]
    pub channels: u8,
    /// LAME quality preset (0 = best, 9 = worst).
    #[serde(default = "default_quality")]
    pub quality: u8,
    /// Sources shorter than this are skipped.
    #[serde(default = "default_min_duration")]
    pub min_duration_secs: f64,
}

fn default_bitrate() -> String {
    "192k".to_string()
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_channels() -> u8 {
    2
}

fn default_quality() -> u8 {
    4
}

fn default_min_duration() -> f64 {
    1.0
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            bitrate: default_bitrate(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            quality: default_quality(),
            min_duration_secs: default_min_duration(),
        }
    }
}

/// External tool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FfmpegConfig {
    /// Path to the ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
    /// Path to the ffprobe binary.
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,
    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Timeout for a single ffprobe invocation in seconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
    /// Timeout for a single encoding invocation in seconds.
    #[serde(default = "default_convert_timeout")]
    pub convert_timeout_secs: u64,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_log_level() -> String {
    "warning".to_string()
}

fn default_probe_timeout() -> u64 {
    10
}

fn default_convert_timeout() -> u64 {
    600
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            log_level: default_log_level(),
            probe_timeout_secs: default_probe_timeout(),
            convert_timeout_secs: default_convert_timeout(),
        }
    }
}
