use serde::{Deserialize, Serialize};

use crate::entities::null_as_default;

pub const SUCCESS_CODE: i32 = 200;
pub const FAILURE_CODE: i32 = 500;

/// 统一响应格式，所有接口都以 HTTP 200 返回，成功与否由 `code` 表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// 200 表示成功，其他表示失败
    pub code: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
}

impl Response {
    pub fn success() -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: String::new(),
            content: None,
        }
    }

    pub fn success_with_content<T: Serialize>(content: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: String::new(),
            content: serde_json::to_value(content).ok(),
        }
    }

    pub fn error<S: Into<String>>(msg: S) -> Self {
        Self {
            code: FAILURE_CODE,
            msg: msg.into(),
            content: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    pub fn message(&self) -> &str {
        &self.msg
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::success()
    }
}
