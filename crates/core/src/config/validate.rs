use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Run section exists (enforced by serde)
/// - max_parallel is at least 1
/// - encoding parameters are usable
/// - timeouts are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.run.max_parallel == 0 {
        return Err(ConfigError::ValidationError(
            "run.max_parallel cannot be 0".to_string(),
        ));
    }

    if config.encoding.bitrate.is_empty() {
        return Err(ConfigError::ValidationError(
            "encoding.bitrate cannot be empty".to_string(),
        ));
    }

    if config.encoding.min_duration_secs <= 0.0 {
        return Err(ConfigError::ValidationError(
            "encoding.min_duration_secs must be positive".to_string(),
        ));
    }

    if config.ffmpeg.probe_timeout_secs == 0 || config.ffmpeg.convert_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "ffmpeg timeouts cannot be 0".to_string(),
        ));
    }

    Ok(())
}
