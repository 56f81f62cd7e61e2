use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::validation::{ConfigValidator, ValidationUtils};

/// 任务日志文件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobLogConfig {
    pub enabled: bool,
    pub dir: PathBuf,
    /// 日志保留天数
    pub retention_days: u32,
    pub cleanup_interval_seconds: u64,
}

impl Default for JobLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("/tmp/xxl-job/jobhandler"),
            retention_days: 7,
            cleanup_interval_seconds: 24 * 60 * 60,
        }
    }
}

impl JobLogConfig {
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_seconds)
    }
}

impl ConfigValidator for JobLogConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        if !self.enabled {
            return Ok(());
        }
        ValidationUtils::validate_not_empty(&self.dir.to_string_lossy(), "job_log.dir")?;
        ValidationUtils::validate_positive(self.retention_days as u64, "job_log.retention_days")?;
        ValidationUtils::validate_positive(
            self.cleanup_interval_seconds,
            "job_log.cleanup_interval_seconds",
        )?;
        Ok(())
    }
}
