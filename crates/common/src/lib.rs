//! # executor-common
//!
//! 执行器的共享常量和工具函数

pub mod constants;
pub mod utils;

pub use constants::*;
pub use utils::*;

pub use executor_errors::{ExecutorError, ExecutorResult};
