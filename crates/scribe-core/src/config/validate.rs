//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.request_timeout_ms must be > 0".into(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "retry.max_attempts must be > 0".into(),
            ));
        }
        if !(self.retry.multiplier.is_finite() && self.retry.multiplier > 0.0) {
            return Err(ConfigError::ValidationError(
                "retry.multiplier must be a positive number".into(),
            ));
        }
        if self.retry.min_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigError::ValidationError(
                "retry.min_delay_ms must not exceed retry.max_delay_ms".into(),
            ));
        }
        if self.gemini.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "gemini.endpoint must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.limits.request_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_inverted_delays() {
        let mut config = Config::default();
        config.retry.min_delay_ms = 20_000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_delay_ms"));
    }

    #[test]
    fn test_validate_rejects_bad_multiplier() {
        let mut config = Config::default();
        config.retry.multiplier = 0.0;
        assert!(config.validate().is_err());

        config.retry.multiplier = f64::NAN;
        assert!(config.validate().is_err());
    }
}
