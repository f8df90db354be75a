//! Configuration validation for parley.
//!
//! Checks that startup settings are present and within valid ranges before
//! the server binds.

use thiserror::Error;

use crate::config::{ChatConfig, ContextMode, InferenceConfig, ObservabilityConfig};

/// Log levels accepted by the logging setup.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Log formats accepted by the logging setup.
const LOG_FORMATS: &[&str] = &["json", "pretty"];

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port {port}: must be between 1 and 65535")]
    InvalidPort { port: u16, field: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Validate for ChatConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push(ValidationError::InvalidPort {
                port: self.port,
                field: "port".into(),
            });
        }

        if self.host.trim().is_empty() {
            errors.push(ValidationError::MissingField {
                field: "host".into(),
            });
        }

        if let Err(e) = self.context.validate() {
            errors.push(e);
        }

        if self.api_key_file.as_os_str().is_empty() {
            errors.push(ValidationError::MissingField {
                field: "api_key_file".into(),
            });
        }

        // The remote API is never called in test mode.
        if !self.test_mode {
            if let Err(e) = self.inference.validate() {
                errors.push(e);
            }
        }

        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }
}

impl Validate for ContextMode {
    fn validate(&self) -> ValidationResult<()> {
        if self.budget() == 0 {
            return Err(ValidationError::InvalidValue {
                field: format!("context.{}", self.unit()),
                reason: "budget must be a positive integer".into(),
            });
        }
        Ok(())
    }
}

impl Validate for InferenceConfig {
    fn validate(&self) -> ValidationResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ValidationError::InvalidValue {
                field: "inference.base_url".into(),
                reason: format!("must start with http:// or https://, got {}", self.base_url),
            });
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "inference.model".into(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "inference.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("expected one of {:?}", LOG_LEVELS),
            });
        }
        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("expected one of {:?}", LOG_FORMATS),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ChatConfig::default().validate().is_ok());
    }

    #[test_case(ContextMode::Tokens(0) ; "zero tokens")]
    #[test_case(ContextMode::Chars(0) ; "zero chars")]
    fn test_zero_budget_rejected(mode: ContextMode) {
        let err = mode.validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }

    #[test]
    fn test_zero_port_rejected() {
        let config = ChatConfig {
            port: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPort { port: 0, .. })
        ));
    }

    #[test_case("json", true)]
    #[test_case("pretty", true)]
    #[test_case("xml", false)]
    fn test_log_format(format: &str, ok: bool) {
        let obs = ObservabilityConfig {
            log_format: format.into(),
            ..Default::default()
        };
        assert_eq!(obs.validate().is_ok(), ok);
    }

    #[test]
    fn test_bad_base_url_ignored_in_test_mode() {
        let mut config = ChatConfig::default();
        config.inference.base_url = "ftp://nowhere".into();
        assert!(config.validate().is_err());

        config.test_mode = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_multiple_errors_collected() {
        let mut config = ChatConfig {
            port: 0,
            context: ContextMode::Chars(0),
            ..Default::default()
        };
        config.observability.log_level = "loud".into();
        match config.validate() {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }
}
