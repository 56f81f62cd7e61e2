use crate::{ConfigError, ConfigResult};

/// Trait for configuration validation
pub trait ConfigValidator {
    fn validate(&self) -> ConfigResult<()>;
}

/// General validation utilities
pub struct ValidationUtils;

impl ValidationUtils {
    /// Validate that a string is not empty
    pub fn validate_not_empty(value: &str, field_name: &str) -> ConfigResult<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{field_name} cannot be empty"
            )));
        }
        Ok(())
    }

    /// Validate that a port number is valid
    pub fn validate_port(port: u16) -> ConfigResult<()> {
        if port == 0 {
            return Err(ConfigError::Validation("port cannot be 0".to_string()));
        }
        Ok(())
    }

    /// Validate that an interval or timeout is non-zero
    pub fn validate_positive(value: u64, field_name: &str) -> ConfigResult<()> {
        if value == 0 {
            return Err(ConfigError::Validation(format!(
                "{field_name} must be greater than 0"
            )));
        }
        Ok(())
    }

    /// Validate that a count is reasonable
    pub fn validate_count(count: usize, field_name: &str, max: usize) -> ConfigResult<()> {
        if count == 0 {
            return Err(ConfigError::Validation(format!(
                "{field_name} must be greater than 0"
            )));
        }
        if count > max {
            return Err(ConfigError::Validation(format!(
                "{field_name} must be less than or equal to {max}"
            )));
        }
        Ok(())
    }

    /// Validate that a value is one of the allowed options
    pub fn validate_one_of(value: &str, field_name: &str, options: &[&str]) -> ConfigResult<()> {
        if !options.contains(&value) {
            return Err(ConfigError::Validation(format!(
                "Invalid {field_name}: {value}. Valid options: {options:?}"
            )));
        }
        Ok(())
    }
}
