pub mod admin_client;
pub mod background;
pub mod block_strategy;
pub mod callback_reporter;
pub mod handler;
pub mod job;
pub mod job_log;
pub mod job_manager;
pub mod job_table;
pub mod registrar;

pub use admin_client::AdminClient;
pub use background::TaskHandle;
pub use block_strategy::Admission;
pub use callback_reporter::CallbackReporter;
pub use handler::{handler_fn, FnHandler, HandlerRegistry, JobContext, JobHandler};
pub use job::Job;
pub use job_log::{JobLogStore, JobLogger};
pub use job_manager::JobManager;
pub use job_table::JobTable;
pub use registrar::Registrar;
