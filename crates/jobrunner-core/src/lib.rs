pub mod config;
pub mod logging;

pub mod control;
pub mod error;
pub mod handler;
pub mod queue;
pub mod runner;
pub mod source;

pub use config::Settings;
pub use error::{Fault, HandlerError, SettingsError};
pub use handler::Handler;
pub use queue::{QueueSource, QueueStats};
pub use runner::{JobRunner, JobStatus, RunSummary};
pub use source::InputSource;
pub use tokio_util::sync::CancellationToken;
