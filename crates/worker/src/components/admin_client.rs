use std::time::Instant;

use executor_common::{
    readable_size, truncate_duration, ACCESS_TOKEN_HEADER, ADMIN_CALLBACK_PATH,
    ADMIN_REGISTRY_PATH, ADMIN_REGISTRY_REMOVE_PATH,
};
use executor_config::AdminConfig;
use executor_domain::{CallbackParam, RegistryParam, Response};
use executor_errors::{ExecutorError, ExecutorResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::Serialize;
use tracing::{debug, error, info};

/// 调度中心客户端：注册、注销和结果回调
#[derive(Debug, Clone)]
pub struct AdminClient {
    base_url: String,
    http_client: reqwest::Client,
    size_limit: u64,
}

impl AdminClient {
    pub fn new(config: &AdminConfig) -> ExecutorResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = config.access_token() {
            let value = HeaderValue::from_str(token).map_err(|e| {
                ExecutorError::config_error(format!("invalid admin access token: {e}"))
            })?;
            let name = HeaderName::from_bytes(ACCESS_TOKEN_HEADER.as_bytes())
                .map_err(|e| ExecutorError::config_error(e.to_string()))?;
            headers.insert(name, value);
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.client_timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url: config.base_url(),
            http_client,
            size_limit: config.size_limit_bytes,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn register(&self, param: &RegistryParam) -> ExecutorResult<()> {
        self.post(ADMIN_REGISTRY_PATH, param).await?;
        debug!("registered {} at {}", param.registry_key, param.registry_value);
        Ok(())
    }

    pub async fn registry_remove(&self, param: &RegistryParam) -> ExecutorResult<()> {
        self.post(ADMIN_REGISTRY_REMOVE_PATH, param).await?;
        info!(
            "unregistered {} at {} from admin",
            param.registry_key, param.registry_value
        );
        Ok(())
    }

    pub async fn callback(&self, params: &[CallbackParam]) -> ExecutorResult<()> {
        self.post(ADMIN_CALLBACK_PATH, params).await?;
        Ok(())
    }

    /// 发送请求并按 `[状态码][响应大小][耗时] url: ..., res: ...` 记录日志
    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> ExecutorResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        let started = Instant::now();

        let response = match self.http_client.post(&url).json(body).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("request to admin failed, url: {}, err: {}", url, e);
                return Err(e.into());
            }
        };
        let status = response.status();
        let bytes = response.bytes().await?;
        let elapsed = truncate_duration(started.elapsed());

        let size = bytes.len() as u64;
        let content = if size > self.size_limit {
            "omitted".into()
        } else {
            String::from_utf8_lossy(&bytes)
        };
        info!(
            "[{}][{}][{:?}] url: {}, res: {}",
            status.as_u16(),
            readable_size(size),
            elapsed,
            url,
            content
        );

        if !status.is_success() {
            return Err(ExecutorError::Network(format!("HTTP {status} from {url}")));
        }
        let result: Response = serde_json::from_slice(&bytes)?;
        if !result.is_success() {
            return Err(ExecutorError::AdminRejected {
                code: result.code,
                msg: result.msg,
            });
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_base_url() {
        let config = AdminConfig {
            address: "127.0.0.1:8080/xxl-job-admin/".to_string(),
            ..Default::default()
        };
        let client = AdminClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080/xxl-job-admin");
    }

    #[test]
    fn test_invalid_token_is_config_error() {
        let config = AdminConfig {
            access_token: "bad\ntoken".to_string(),
            ..Default::default()
        };
        let err = AdminClient::new(&config).unwrap_err();
        assert!(matches!(err, ExecutorError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_unreachable_admin_is_transport_error() {
        let config = AdminConfig {
            address: "http://127.0.0.1:1".to_string(),
            client_timeout_ms: 500,
            ..Default::default()
        };
        let client = AdminClient::new(&config).unwrap();
        let err = client
            .register(&RegistryParam::executor("app", "http://127.0.0.1:9999"))
            .await
            .unwrap_err();
        assert!(err.is_transport_error());
    }
}
