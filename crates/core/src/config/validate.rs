use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one conversion may run at a time
/// - The discovery channel has room for at least one candidate
/// - A timeout, if set, is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.processor.max_parallel_conversions == 0 {
        return Err(ConfigError::ValidationError(
            "processor.max_parallel_conversions cannot be 0".to_string(),
        ));
    }

    if config.processor.channel_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "processor.channel_capacity cannot be 0".to_string(),
        ));
    }

    if config.converter.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "converter.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
