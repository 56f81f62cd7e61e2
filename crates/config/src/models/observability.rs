use serde::{Deserialize, Serialize};

use crate::validation::{ConfigValidator, ValidationUtils};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// `pretty` 或 `json`
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl ConfigValidator for ObservabilityConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        ValidationUtils::validate_one_of(
            &self.log_level.to_lowercase(),
            "observability.log_level",
            &["trace", "debug", "info", "warn", "error"],
        )?;
        ValidationUtils::validate_one_of(
            &self.log_format,
            "observability.log_format",
            &["pretty", "json"],
        )?;
        Ok(())
    }
}
