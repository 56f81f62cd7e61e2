//! # executor-domain
//!
//! 执行器与调度中心之间的协议实体。字段名与调度中心的JSON协议保持一致。

pub mod entities;
pub mod response;
pub mod value_objects;

pub use entities::*;
pub use response::*;
pub use value_objects::*;
