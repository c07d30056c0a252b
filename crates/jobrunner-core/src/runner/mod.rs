//! Bounded-concurrency dispatch loop.
//!
//! Keeps up to `max_concurrent_inputs` inputs in flight; when one finishes its
//! outcome is reported to the source and the set is refilled. On stop, no new
//! inputs are fetched and every job already in flight is waited for and reported.

mod job;
mod summary;

use anyhow::Result;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::Settings;
use crate::handler::Handler;
use crate::source::InputSource;

use job::ActiveJobs;

pub use job::JobStatus;
pub use summary::RunSummary;

/// Pulls inputs from `S`, runs them through `H`, and reports each outcome back to `S`.
pub struct JobRunner<I, S, H> {
    source: Arc<S>,
    handler: Arc<H>,
    settings: Settings,
    _input: PhantomData<fn(I) -> I>,
}

impl<I, S, H> JobRunner<I, S, H>
where
    I: Clone + Send + 'static,
    S: InputSource<I>,
    H: Handler<I>,
{
    pub fn new(source: Arc<S>, handler: Arc<H>, settings: Settings) -> Self {
        Self {
            source,
            handler,
            settings,
            _input: PhantomData,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run with no stop signal. Returns once the source reports it has no more
    /// inputs (`wait_for_next_input` returns `None`) and every job is reported.
    pub async fn run_until_exhausted(&mut self) -> Result<RunSummary> {
        self.run(&CancellationToken::new()).await
    }

    /// Run until `stop` fires (or the source is exhausted), then drain.
    ///
    /// Every dispatched input gets exactly one of `complete_input`,
    /// `handle_exception_for_input` or `handle_canceled_input` before this returns.
    /// An error from the source ends the run immediately; jobs still in flight
    /// at that point are aborted and not reported.
    pub async fn run(&mut self, stop: &CancellationToken) -> Result<RunSummary> {
        let max = self.settings.max_concurrent_inputs();
        let mut jobs = ActiveJobs::with_capacity(max);
        let mut summary = RunSummary::default();
        tracing::info!(max_concurrent_inputs = max, "dispatch loop started");

        while !stop.is_cancelled() {
            self.fill(&mut jobs, stop, &mut summary).await?;

            if jobs.is_empty() {
                tracing::debug!("no input available; waiting on source");
                match self.source.wait_for_next_input(stop).await? {
                    Some(input) => self.dispatch(&mut jobs, input, stop, &mut summary),
                    None => break,
                }
                if stop.is_cancelled() {
                    break;
                }
                continue;
            }

            jobs.wait_any().await;
            self.finalize_completed(&mut jobs, &mut summary).await?;
        }

        if !jobs.is_empty() {
            tracing::info!(outstanding = jobs.len(), "draining in-flight jobs");
        }
        jobs.wait_all().await;
        self.finalize_completed(&mut jobs, &mut summary).await?;

        tracing::info!("dispatch loop finished: {}", summary);
        Ok(summary)
    }

    /// Dispatch immediately available inputs until the source has none or the cap is reached.
    async fn fill(
        &self,
        jobs: &mut ActiveJobs<I>,
        stop: &CancellationToken,
        summary: &mut RunSummary,
    ) -> Result<()> {
        while jobs.len() < self.settings.max_concurrent_inputs() {
            let Some(input) = self.source.get_next_input().await? else {
                break;
            };
            self.dispatch(jobs, input, stop, summary);
        }
        Ok(())
    }

    fn dispatch(
        &self,
        jobs: &mut ActiveJobs<I>,
        input: I,
        stop: &CancellationToken,
        summary: &mut RunSummary,
    ) {
        let handler = Arc::clone(&self.handler);
        let task_input = input.clone();
        let task_stop = stop.clone();
        let seq = jobs.spawn(
            async move { handler.handle(task_input, task_stop).await },
            input,
        );
        summary.record_dispatch(jobs.len());
        tracing::debug!(job = seq, active = jobs.len(), "dispatched input");
    }

    /// Report every terminal job and drop it from the set; running jobs stay.
    async fn finalize_completed(
        &self,
        jobs: &mut ActiveJobs<I>,
        summary: &mut RunSummary,
    ) -> Result<()> {
        for job in jobs.take_terminal() {
            let seq = job.seq;
            match job.status {
                JobStatus::Faulted(fault) => {
                    tracing::warn!(job = seq, "input faulted: {}", fault);
                    self.source
                        .handle_exception_for_input(job.input, fault)
                        .await?;
                    summary.faulted += 1;
                }
                JobStatus::Canceled => {
                    tracing::info!(job = seq, "input canceled");
                    self.source.handle_canceled_input(job.input).await?;
                    summary.canceled += 1;
                }
                JobStatus::Succeeded => {
                    tracing::debug!(job = seq, "input completed");
                    self.source.complete_input(job.input).await?;
                    summary.completed += 1;
                }
            }
        }
        Ok(())
    }
}
