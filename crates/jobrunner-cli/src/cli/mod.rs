//! CLI for the job runner.

mod commands;
mod input;
mod shell;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use jobrunner_core::config;
use std::path::PathBuf;

use commands::{run_completions, run_config, run_inputs, run_man};

/// Top-level CLI for the job runner.
#[derive(Debug, Parser)]
#[command(name = "jobrunner")]
#[command(about = "Run a command once per input line with bounded concurrency", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run COMMAND for every input line, keeping up to N running at once.
    ///
    /// Each input is appended as the last argument and exported as $JOBRUNNER_INPUT.
    Run {
        /// Maximum inputs in flight (overrides max_concurrent_inputs from config.toml).
        #[arg(long, short = 'j', value_name = "N")]
        jobs: Option<usize>,
        /// Read inputs from FILE instead of stdin, one per line.
        #[arg(long, short = 'i', value_name = "FILE")]
        input: Option<PathBuf>,
        /// Stop taking new inputs after SECS seconds; running commands are stopped and reported canceled.
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Command and arguments to run per input.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Show the config file location and effective settings.
    Config,

    /// Print shell completions to stdout.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print a man page to stdout.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Run {
                jobs,
                input,
                timeout,
                command,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_inputs(cfg, jobs, input.as_deref(), timeout, command).await?;
            }
            CliCommand::Config => run_config()?,
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
