use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::validation::{ConfigValidator, ValidationUtils};

/// 调度中心相关配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// 调度中心地址，例如 `localhost:8080/xxl-job-admin`
    pub address: String,
    /// 访问令牌，为空时不发送令牌请求头
    pub access_token: String,
    pub client_timeout_ms: u64,
    /// 回调队列容量，队列满时完成的任务会等待入队
    pub callback_buffer_size: usize,
    pub callback_interval_ms: u64,
    pub register_interval_ms: u64,
    /// 响应体超过该大小（字节）时日志中不打印响应内容
    pub size_limit_bytes: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:8080/xxl-job-admin".to_string(),
            access_token: "default_token".to_string(),
            client_timeout_ms: 3000,
            callback_buffer_size: 1024,
            callback_interval_ms: 1000,
            register_interval_ms: 10_000,
            size_limit_bytes: 10240,
        }
    }
}

impl AdminConfig {
    /// 规范化后的调度中心地址：补全 `http://` 前缀并去掉结尾的 `/`
    pub fn base_url(&self) -> String {
        let address = self.address.trim();
        let address = if address.starts_with("http") {
            address.to_string()
        } else {
            format!("http://{address}")
        };
        address.trim_end_matches('/').to_string()
    }

    pub fn access_token(&self) -> Option<&str> {
        let token = self.access_token.trim();
        (!token.is_empty()).then_some(token)
    }

    pub fn client_timeout(&self) -> Duration {
        Duration::from_millis(self.client_timeout_ms)
    }

    pub fn callback_interval(&self) -> Duration {
        Duration::from_millis(self.callback_interval_ms)
    }

    pub fn register_interval(&self) -> Duration {
        Duration::from_millis(self.register_interval_ms)
    }
}

impl ConfigValidator for AdminConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        ValidationUtils::validate_not_empty(&self.address, "admin.address")?;
        ValidationUtils::validate_positive(self.client_timeout_ms, "admin.client_timeout_ms")?;
        ValidationUtils::validate_count(
            self.callback_buffer_size,
            "admin.callback_buffer_size",
            1_000_000,
        )?;
        ValidationUtils::validate_positive(self.callback_interval_ms, "admin.callback_interval_ms")?;
        ValidationUtils::validate_positive(self.register_interval_ms, "admin.register_interval_ms")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let mut config = AdminConfig {
            address: "localhost:8080/xxl-job-admin".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://localhost:8080/xxl-job-admin");

        config.address = "https://admin.example.com/xxl-job-admin/".to_string();
        assert_eq!(config.base_url(), "https://admin.example.com/xxl-job-admin");
    }

    #[test]
    fn test_access_token() {
        let mut config = AdminConfig::default();
        assert_eq!(config.access_token(), Some("default_token"));
        config.access_token = String::new();
        assert_eq!(config.access_token(), None);
    }

    #[test]
    fn test_admin_config_validation() {
        assert!(AdminConfig::default().validate().is_ok());

        let config = AdminConfig {
            callback_buffer_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AdminConfig {
            register_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
