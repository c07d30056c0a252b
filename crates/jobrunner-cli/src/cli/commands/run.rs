//! `jobrunner run` – feed input lines through the dispatch loop.

use anyhow::{Context, Result};
use jobrunner_core::{control, CancellationToken, JobRunner, QueueSource, Settings};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::input;
use crate::cli::shell::ShellHandler;

pub async fn run_inputs(
    cfg: Settings,
    jobs: Option<usize>,
    input_path: Option<&Path>,
    timeout_secs: Option<u64>,
    command: Vec<String>,
) -> Result<()> {
    let settings = match jobs {
        Some(n) => Settings::new(n).context("--jobs")?,
        None => cfg,
    };
    let handler = Arc::new(ShellHandler::new(command)?);

    let inputs = input::read_inputs(input_path).await?;
    if inputs.is_empty() {
        println!("No inputs.");
        return Ok(());
    }
    tracing::info!(
        inputs = inputs.len(),
        max_concurrent_inputs = settings.max_concurrent_inputs(),
        "starting run"
    );

    let source = Arc::new(QueueSource::from_inputs(inputs));
    source.close();

    let stop = CancellationToken::new();
    let interrupt = control::stop_on_ctrl_c(stop.clone());
    let deadline = timeout_secs.map(|s| control::stop_after(stop.clone(), Duration::from_secs(s)));

    let mut runner = JobRunner::new(Arc::clone(&source), handler, settings);
    let result = runner.run(&stop).await;

    // Release the signal/deadline helpers.
    stop.cancel();
    let _ = interrupt.await;
    if let Some(deadline) = deadline {
        let _ = deadline.await;
    }

    let summary = result?;
    println!("{}", summary);
    let not_started = source.len();
    if not_started > 0 {
        println!("{} input(s) not started", not_started);
    }
    if summary.faulted > 0 {
        anyhow::bail!("{} input(s) failed", summary.faulted);
    }
    Ok(())
}
