//! # 系统常量定义
//!
//! 执行器协议相关的常量

/// 系统名称
pub const SYSTEM_NAME: &str = "xxljob-executor";

/// 系统版本
pub const SYSTEM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// 调度中心与执行器之间传递访问令牌的请求头
pub const ACCESS_TOKEN_HEADER: &str = "XXL-JOB-ACCESS-TOKEN";

/// 调度中心接口
pub const ADMIN_REGISTRY_PATH: &str = "/api/registry";
pub const ADMIN_REGISTRY_REMOVE_PATH: &str = "/api/registryRemove";
pub const ADMIN_CALLBACK_PATH: &str = "/api/callback";

/// 执行器接口
pub const EXECUTOR_BEAT_PATH: &str = "/beat";
pub const EXECUTOR_IDLE_BEAT_PATH: &str = "/idleBeat";
pub const EXECUTOR_RUN_PATH: &str = "/run";
pub const EXECUTOR_KILL_PATH: &str = "/kill";
pub const EXECUTOR_LOG_PATH: &str = "/log";

/// 回调结果中成功时的消息
pub const CALLBACK_SUCCESS_MSG: &str = "OK";

/// 默认执行器端口
pub const DEFAULT_EXECUTOR_PORT: u16 = 9999;
