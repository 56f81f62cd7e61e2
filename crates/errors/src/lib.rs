use thiserror::Error;

/// 执行器错误
///
/// 触发准入类错误（重复logId、阻塞策略拒绝、处理器不存在）的文本会原样返回给调度中心，
/// 因此这些文本属于协议的一部分，不要随意修改。
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("duplicate log id")]
    DuplicateLogId { job_id: i64, log_id: i64 },
    #[error("a job of same id is already running")]
    JobBusy { job_id: i64 },
    #[error("job handler not found")]
    HandlerNotFound { name: String },
    #[error("job is running")]
    JobRunning { job_id: i64 },
    #[error("access token is invalid")]
    InvalidAccessToken,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("序列化错误: {0}")]
    Serialization(String),
    #[error("网络错误: {0}")]
    Network(String),
    #[error("调度中心返回失败: code={code}, msg={msg}")]
    AdminRejected { code: i32, msg: String },
    #[error("配置错误: {0}")]
    Configuration(String),
    #[error("IO错误: {0}")]
    Io(String),
    #[error("内部错误: {0}")]
    Internal(String),
}

pub type ExecutorResult<T> = Result<T, ExecutorError>;

impl ExecutorError {
    pub fn handler_not_found<S: Into<String>>(name: S) -> Self {
        Self::HandlerNotFound { name: name.into() }
    }
    pub fn invalid_request<S: Into<String>>(msg: S) -> Self {
        Self::InvalidRequest(msg.into())
    }
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    /// 触发请求在准入阶段被拒绝，任务没有被创建
    pub fn is_admission_error(&self) -> bool {
        matches!(
            self,
            ExecutorError::DuplicateLogId { .. }
                | ExecutorError::JobBusy { .. }
                | ExecutorError::HandlerNotFound { .. }
        )
    }
    /// 与调度中心通信失败，只记录日志，不影响执行器运行
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            ExecutorError::Network(_) | ExecutorError::AdminRejected { .. }
        )
    }
}

impl From<serde_json::Error> for ExecutorError {
    fn from(err: serde_json::Error) -> Self {
        ExecutorError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for ExecutorError {
    fn from(err: reqwest::Error) -> Self {
        ExecutorError::Network(err.to_string())
    }
}

impl From<std::io::Error> for ExecutorError {
    fn from(err: std::io::Error) -> Self {
        ExecutorError::Io(err.to_string())
    }
}

impl From<anyhow::Error> for ExecutorError {
    fn from(err: anyhow::Error) -> Self {
        ExecutorError::Internal(err.to_string())
    }
}
