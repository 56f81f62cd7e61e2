//! # executor-worker
//!
//! 任务执行核心：任务表、阻塞策略、任务生命周期，以及与调度中心的注册和结果回调。

pub mod components;
pub mod executor;

pub use components::{
    handler_fn, AdminClient, HandlerRegistry, Job, JobContext, JobHandler, JobLogStore, JobTable,
};
pub use executor::{registry_address, Executor, ExecutorBuilder};

pub use executor_domain::JobParam;
