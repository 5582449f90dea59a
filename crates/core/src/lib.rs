pub mod config;
pub mod runner;
pub mod testing;
pub mod transcoder;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, EncodingConfig,
    FfmpegConfig, RunConfig,
};
pub use runner::{BatchRunner, RunSummary, RunnerError};
pub use transcoder::{
    AudioStreamInfo, EncoderSupport, FailureKind, FfmpegTranscoder, FileOutcome, ProbeVerdict,
    RejectReason, TranscodeError, Transcoder,
};
