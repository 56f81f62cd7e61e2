pub mod admin;
pub mod app_config;
pub mod executor;
pub mod job_log;
pub mod observability;
pub mod server;

pub use admin::*;
pub use app_config::*;
pub use executor::*;
pub use job_log::*;
pub use observability::*;
pub use server::*;
