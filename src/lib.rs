//! # xxljob-executor
//!
//! xxl-job 执行器节点：接收调度中心的触发请求，在本地运行注册的任务处理器，并回调执行结果。

pub mod app;
pub mod common;
pub mod handlers;
pub mod shutdown;

pub use app::Application;
pub use shutdown::{wait_for_shutdown_signal, ShutdownManager};
