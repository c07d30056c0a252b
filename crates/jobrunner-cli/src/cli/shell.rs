//! Handler that runs an external command per input.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use jobrunner_core::{CancellationToken, Handler, HandlerError};
use std::process::Stdio;
use tokio::process::Command;

/// Environment variable carrying the input to the child process.
pub const INPUT_ENV: &str = "JOBRUNNER_INPUT";

/// Runs `program args... <input>` with `$JOBRUNNER_INPUT` set. Non-zero exit is a
/// failure; the child is killed if the stop signal fires first.
#[derive(Debug)]
pub struct ShellHandler {
    program: String,
    args: Vec<String>,
}

impl ShellHandler {
    pub fn new(command: Vec<String>) -> anyhow::Result<Self> {
        let mut parts = command.into_iter();
        let program = parts.next().ok_or_else(|| anyhow!("no command given"))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait]
impl Handler<String> for ShellHandler {
    async fn handle(&self, input: String, stop: CancellationToken) -> Result<(), HandlerError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(&input)
            .env(INPUT_ENV, &input)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("spawn {}", self.program))?;

        let waited = tokio::select! {
            status = child.wait() => Some(status),
            _ = stop.cancelled() => None,
        };

        match waited {
            Some(status) => {
                let status = status.context("wait for child")?;
                if status.success() {
                    tracing::debug!(input = %input, "command succeeded");
                    Ok(())
                } else {
                    Err(anyhow!("{} exited with {} for {:?}", self.program, status, input).into())
                }
            }
            None => {
                if let Err(e) = child.kill().await {
                    tracing::warn!(input = %input, "could not kill child: {}", e);
                }
                Err(HandlerError::Canceled)
            }
        }
    }
}
