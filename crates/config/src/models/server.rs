use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::validation::{ConfigValidator, ValidationUtils};

pub const SUPPORTED_SIGNALS: [&str; 4] = ["SIGINT", "SIGQUIT", "SIGTERM", "SIGHUP"];

/// 执行器HTTP服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_host: String,
    pub port: u16,
    pub idle_timeout_seconds: u64,
    pub read_timeout_seconds: u64,
    pub write_timeout_seconds: u64,
    /// 优雅关闭时等待处理中请求的最长时间
    pub wait_timeout_seconds: u64,
    pub interrupt_signals: Vec<String>,
    /// 是否校验调度中心请求携带的访问令牌
    pub validate_access_token: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 9999,
            idle_timeout_seconds: 60,
            read_timeout_seconds: 15,
            write_timeout_seconds: 15,
            wait_timeout_seconds: 15,
            interrupt_signals: vec![
                "SIGINT".to_string(),
                "SIGQUIT".to_string(),
                "SIGTERM".to_string(),
            ],
            validate_access_token: false,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_seconds)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_seconds)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_seconds)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_seconds)
    }
}

impl ConfigValidator for ServerConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        ValidationUtils::validate_not_empty(&self.bind_host, "server.bind_host")?;
        ValidationUtils::validate_port(self.port)?;
        ValidationUtils::validate_positive(self.idle_timeout_seconds, "server.idle_timeout_seconds")?;
        ValidationUtils::validate_positive(self.read_timeout_seconds, "server.read_timeout_seconds")?;
        ValidationUtils::validate_positive(
            self.write_timeout_seconds,
            "server.write_timeout_seconds",
        )?;
        if self.interrupt_signals.is_empty() {
            return Err(crate::ConfigError::Validation(
                "server.interrupt_signals cannot be empty".to_string(),
            ));
        }
        for signal in &self.interrupt_signals {
            ValidationUtils::validate_one_of(
                signal,
                "server.interrupt_signals",
                &SUPPORTED_SIGNALS,
            )?;
        }
        Ok(())
    }
}
