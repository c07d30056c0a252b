//! CLI command handlers, one per file.

mod config;
mod docs;
mod run;

pub use config::run_config;
pub use docs::{run_completions, run_man};
pub use run::run_inputs;
