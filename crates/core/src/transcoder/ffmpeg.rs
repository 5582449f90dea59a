//! FFmpeg-based transcoder implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use crate::config::{EncodingConfig, FfmpegConfig};

use super::error::TranscodeError;
use super::support::EncoderSupport;
use super::traits::Transcoder;
use super::types::{AudioStreamInfo, FailureKind, FileOutcome, ProbeVerdict, RejectReason};

/// Smallest byte size a produced MP3 may have before it is considered
/// truncated and rejected without decoding.
const MIN_OUTPUT_BYTES: u64 = 1024;

/// Probe diagnostics are cut to this many characters in skip reasons.
const MAX_PROBE_DETAIL: usize = 50;

/// Name of the temporary file used to check output-directory write access.
const WRITE_TEST_FILE: &str = ".shellac-write-test.tmp";

/// FFmpeg-based transcoder implementation.
pub struct FfmpegTranscoder {
    ffmpeg: FfmpegConfig,
    encoding: EncodingConfig,
}

impl FfmpegTranscoder {
    /// Creates a new transcoder with the given tool and encoding configuration.
    pub fn new(ffmpeg: FfmpegConfig, encoding: EncodingConfig) -> Self {
        Self { ffmpeg, encoding }
    }

    /// Creates a transcoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(FfmpegConfig::default(), EncodingConfig::default())
    }

    /// Builds the fixed ffmpeg argument list for one file.
    ///
    /// Only broadly compatible flags: strip video, take the first audio
    /// stream, LAME at a fixed bitrate/rate/channels/quality tuple,
    /// ID3v2.3 tags, Xing header for duration estimation, all cores.
    fn build_encode_args(&self, input: &Path, output: &Path, overwrite: bool) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            self.ffmpeg.log_level.clone(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-vn".to_string(),
            "-map".to_string(),
            "0:a:0".to_string(),
            "-c:a".to_string(),
            "libmp3lame".to_string(),
            "-b:a".to_string(),
            self.encoding.bitrate.clone(),
            "-ar".to_string(),
            self.encoding.sample_rate.to_string(),
            "-ac".to_string(),
            self.encoding.channels.to_string(),
            "-q:a".to_string(),
            self.encoding.quality.to_string(),
            "-id3v2_version".to_string(),
            "3".to_string(),
            "-write_xing".to_string(),
            "1".to_string(),
            "-threads".to_string(),
            "0".to_string(),
            if overwrite { "-y" } else { "-n" }.to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Parses ffprobe JSON output into a probe verdict.
    fn parse_probe_output(path: &Path, output: &str, min_duration_secs: f64) -> ProbeVerdict {
        #[derive(Deserialize)]
        struct ProbeOutput {
            #[serde(default)]
            streams: Vec<ProbeStream>,
            format: Option<ProbeFormat>,
        }

        #[derive(Deserialize)]
        struct ProbeFormat {
            duration: Option<String>,
        }

        #[derive(Deserialize)]
        struct ProbeStream {
            codec_name: Option<String>,
            bit_rate: Option<String>,
            sample_rate: Option<String>,
            channels: Option<u8>,
            duration: Option<String>,
        }

        let probe: ProbeOutput = match serde_json::from_str(output) {
            Ok(probe) => probe,
            Err(e) => {
                return ProbeVerdict::Rejected(RejectReason::Unreadable {
                    detail: truncate_detail(&e.to_string()),
                })
            }
        };

        let Some(stream) = probe.streams.first() else {
            return ProbeVerdict::Rejected(RejectReason::NoAudioStream);
        };

        // Stream-level duration wins; fall back to the container field
        // when it is absent or zero.
        let stream_duration = stream
            .duration
            .as_ref()
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);
        let format_duration = probe
            .format
            .as_ref()
            .and_then(|f| f.duration.as_ref())
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);
        let duration_secs = if stream_duration > 0.0 {
            stream_duration
        } else {
            format_duration
        };

        if duration_secs < min_duration_secs {
            return ProbeVerdict::Rejected(RejectReason::TooShort {
                duration_secs,
            });
        }

        ProbeVerdict::Usable(AudioStreamInfo {
            path: path.to_path_buf(),
            codec: stream.codec_name.clone(),
            bitrate_kbps: stream
                .bit_rate
                .as_ref()
                .and_then(|b| b.parse::<u32>().ok())
                .map(|b| b / 1000),
            sample_rate_hz: stream
                .sample_rate
                .as_ref()
                .and_then(|r| r.parse::<u32>().ok()),
            channels: stream.channels,
            duration_secs,
            stream_count: probe.streams.len(),
        })
    }

    /// Removes a partially written output file, if any.
    async fn remove_partial(output: &Path) {
        if output.exists() {
            if let Err(e) = tokio::fs::remove_file(output).await {
                warn!("Failed to remove partial output {}: {}", output.display(), e);
            }
        }
    }

    /// Runs the encoder for one file and classifies the result.
    async fn run_encode(&self, input: &Path, output: &Path, overwrite: bool) -> FileOutcome {
        let args = self.build_encode_args(input, output, overwrite);
        debug!(
            "Running: {} {}",
            self.ffmpeg.ffmpeg_path.display(),
            args.join(" ")
        );

        let mut child = match Command::new(&self.ffmpeg.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return FileOutcome::Failed(FailureKind::Io {
                    detail: e.to_string(),
                })
            }
        };

        let stderr = child.stderr.take().expect("stderr should be captured");

        let timeout_duration = Duration::from_secs(self.ffmpeg.convert_timeout_secs);
        let result = timeout(timeout_duration, async {
            let mut stderr_buf = String::new();
            let mut reader = BufReader::new(stderr);
            reader.read_to_string(&mut stderr_buf).await?;
            let status = child.wait().await?;
            Ok::<(std::process::ExitStatus, String), std::io::Error>((status, stderr_buf))
        })
        .await;

        match result {
            Ok(Ok((status, stderr_buf))) => {
                if !status.success() {
                    Self::remove_partial(output).await;
                    return FileOutcome::Failed(FailureKind::ExitStatus {
                        code: status.code(),
                        stderr: stderr_buf,
                    });
                }
            }
            Ok(Err(e)) => {
                Self::remove_partial(output).await;
                return FileOutcome::Failed(FailureKind::Io {
                    detail: e.to_string(),
                });
            }
            Err(_) => {
                let _ = child.kill().await;
                Self::remove_partial(output).await;
                return FileOutcome::Failed(FailureKind::Timeout {
                    timeout_secs: self.ffmpeg.convert_timeout_secs,
                });
            }
        }

        if !self.verify(output).await {
            Self::remove_partial(output).await;
            return FileOutcome::Failed(FailureKind::CorruptOutput);
        }

        FileOutcome::Converted
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn validate(&self, output_dir: &Path) -> Result<(), TranscodeError> {
        // Check ffmpeg exists
        let ffmpeg_result = Command::new(&self.ffmpeg.ffmpeg_path)
            .arg("-version")
            .output()
            .await;

        if let Err(e) = ffmpeg_result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(TranscodeError::FfmpegNotFound {
                    path: self.ffmpeg.ffmpeg_path.clone(),
                });
            }
            return Err(TranscodeError::Io(e));
        }

        // Check ffprobe exists
        let ffprobe_result = Command::new(&self.ffmpeg.ffprobe_path)
            .arg("-version")
            .output()
            .await;

        if let Err(e) = ffprobe_result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(TranscodeError::FfprobeNotFound {
                    path: self.ffmpeg.ffprobe_path.clone(),
                });
            }
            return Err(TranscodeError::Io(e));
        }

        // Check the MP3 encoder is compiled in
        let support = EncoderSupport::detect(&self.ffmpeg.ffmpeg_path).await;
        if !support.can_encode_mp3() {
            return Err(TranscodeError::Mp3EncoderMissing);
        }

        // Check the output directory accepts writes
        let write_test = output_dir.join(WRITE_TEST_FILE);
        tokio::fs::write(&write_test, b"")
            .await
            .map_err(|e| TranscodeError::OutputUnwritable {
                path: output_dir.to_path_buf(),
                source: e,
            })?;
        tokio::fs::remove_file(&write_test)
            .await
            .map_err(|e| TranscodeError::OutputUnwritable {
                path: output_dir.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    async fn probe(&self, path: &Path) -> ProbeVerdict {
        if !path.exists() {
            return ProbeVerdict::Rejected(RejectReason::Unreadable {
                detail: "source file missing".to_string(),
            });
        }

        let mut cmd = Command::new(&self.ffmpeg.ffprobe_path);
        cmd.args([
            "-v",
            "error",
            "-select_streams",
            "a",
            "-show_entries",
            "stream=codec_name,bit_rate,sample_rate,channels,duration",
            "-show_entries",
            "format=duration",
            "-of",
            "json",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

        let probe_timeout = Duration::from_secs(self.ffmpeg.probe_timeout_secs);
        let output = match timeout(probe_timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return ProbeVerdict::Rejected(RejectReason::Unreadable {
                    detail: truncate_detail(&e.to_string()),
                })
            }
            Err(_) => {
                return ProbeVerdict::Rejected(RejectReason::Unreadable {
                    detail: format!("probe timed out after {}s", self.ffmpeg.probe_timeout_secs),
                })
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return ProbeVerdict::Rejected(RejectReason::Unreadable {
                detail: truncate_detail(stderr.trim()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_probe_output(path, &stdout, self.encoding.min_duration_secs)
    }

    async fn transcode(&self, input: &Path, output: &Path, overwrite: bool) -> FileOutcome {
        if output.exists() && !overwrite {
            return FileOutcome::SkippedExisting;
        }

        match self.probe(input).await {
            ProbeVerdict::Usable(info) => {
                debug!(
                    "Probed {}: codec {}, {:.1}s, {} stream(s)",
                    input.display(),
                    info.codec.as_deref().unwrap_or("unknown"),
                    info.duration_secs,
                    info.stream_count
                );
            }
            ProbeVerdict::Rejected(reason) => {
                return FileOutcome::SkippedUnusable(reason);
            }
        }

        if let Some(parent) = output.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                return FileOutcome::Failed(FailureKind::Io {
                    detail: format!("creating {}: {}", parent.display(), e),
                });
            }
        }

        self.run_encode(input, output, overwrite).await
    }

    async fn verify(&self, path: &Path) -> bool {
        let meta = match tokio::fs::metadata(path).await {
            Ok(meta) => meta,
            Err(_) => return false,
        };
        if meta.len() < MIN_OUTPUT_BYTES {
            return false;
        }

        // Strict decode pass: only fatal errors surface, samples are
        // discarded, the exit code is the whole verdict.
        let output = Command::new(&self.ffmpeg.ffmpeg_path)
            .args(["-v", "panic", "-i"])
            .arg(path)
            .args(["-f", "null", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await;

        matches!(output, Ok(o) if o.status.success())
    }
}

/// Cuts probe diagnostics down to a size that fits a log line.
fn truncate_detail(detail: &str) -> String {
    detail.chars().take(MAX_PROBE_DETAIL).collect()
}
