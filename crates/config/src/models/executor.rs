use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::validation::{ConfigValidator, ValidationUtils};

/// 执行器自身的配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// 执行器应用名，即调度中心中的执行器 AppName
    pub app_name: String,
    /// 注册到调度中心的完整地址，为空时使用 `http://{ip}:{port}`
    pub address: Option<String>,
    /// 注册使用的IP，为空时自动探测本机IP
    pub ip: Option<String>,
    /// 串行执行时等待前一个任务结束的轮询间隔
    pub serial_poll_interval_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            app_name: "xxl-job-executor-sample".to_string(),
            address: None,
            ip: None,
            serial_poll_interval_ms: 1000,
        }
    }
}

impl ExecutorConfig {
    pub fn serial_poll_interval(&self) -> Duration {
        Duration::from_millis(self.serial_poll_interval_ms)
    }
}

impl ConfigValidator for ExecutorConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        ValidationUtils::validate_not_empty(&self.app_name, "executor.app_name")?;
        if let Some(address) = &self.address {
            ValidationUtils::validate_not_empty(address, "executor.address")?;
        }
        ValidationUtils::validate_positive(
            self.serial_poll_interval_ms,
            "executor.serial_poll_interval_ms",
        )?;
        Ok(())
    }
}
