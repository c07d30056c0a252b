//! In-flight jobs: handler tasks in a `JoinSet`, each paired with the input it is processing.

use std::collections::HashMap;
use std::future::Future;

use tokio::task::{Id, JoinError, JoinSet};

use crate::error::{Fault, HandlerError};

type JoinResult = Result<(Id, Result<(), HandlerError>), JoinError>;

/// Terminal status of one job's handler task.
#[derive(Debug)]
pub enum JobStatus {
    Succeeded,
    Faulted(Fault),
    Canceled,
}

impl JobStatus {
    fn from_handler(result: Result<(), HandlerError>) -> Self {
        match result {
            Ok(()) => JobStatus::Succeeded,
            Err(HandlerError::Canceled) => JobStatus::Canceled,
            Err(HandlerError::Failed(e)) => JobStatus::Faulted(Fault::Error(e)),
        }
    }

    fn from_join_error(e: JoinError) -> Self {
        if e.is_cancelled() {
            return JobStatus::Canceled;
        }
        match e.try_into_panic() {
            Ok(payload) => JobStatus::Faulted(Fault::from_panic(payload)),
            Err(e) => JobStatus::Faulted(Fault::Error(anyhow::Error::new(e))),
        }
    }
}

/// A finished job waiting to be reported.
pub(crate) struct Job<I> {
    pub(crate) seq: u64,
    pub(crate) status: JobStatus,
    pub(crate) input: I,
}

/// Jobs dispatched and not yet reported, owned by a single dispatch loop run.
/// Dropping the set aborts any task still running.
pub(crate) struct ActiveJobs<I> {
    tasks: JoinSet<Result<(), HandlerError>>,
    running: HashMap<Id, (u64, I)>,
    finished: Vec<Job<I>>,
    next_seq: u64,
}

impl<I> ActiveJobs<I> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            tasks: JoinSet::new(),
            running: HashMap::with_capacity(capacity),
            finished: Vec::with_capacity(capacity),
            next_seq: 0,
        }
    }

    /// Running plus finished-but-unreported jobs.
    pub(crate) fn len(&self) -> usize {
        self.running.len() + self.finished.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spawn `task` for `input`; returns its sequence number within this run.
    pub(crate) fn spawn<F>(&mut self, task: F, input: I) -> u64
    where
        F: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = self.tasks.spawn(task).id();
        self.running.insert(id, (seq, input));
        seq
    }

    fn record(&mut self, joined: JoinResult) {
        let (id, status) = match joined {
            Ok((id, result)) => (id, JobStatus::from_handler(result)),
            Err(e) => (e.id(), JobStatus::from_join_error(e)),
        };
        if let Some((seq, input)) = self.running.remove(&id) {
            self.finished.push(Job { seq, status, input });
        }
    }

    /// Wait until at least one job is terminal, then collect every other job
    /// that has already finished.
    pub(crate) async fn wait_any(&mut self) {
        if let Some(joined) = self.tasks.join_next_with_id().await {
            self.record(joined);
        }
        while let Some(joined) = self.tasks.try_join_next_with_id() {
            self.record(joined);
        }
    }

    /// Wait until every job is terminal.
    pub(crate) async fn wait_all(&mut self) {
        while let Some(joined) = self.tasks.join_next_with_id().await {
            self.record(joined);
        }
    }

    /// Take the terminal jobs in dispatch order; running jobs stay in the set.
    pub(crate) fn take_terminal(&mut self) -> Vec<Job<I>> {
        let mut done = std::mem::take(&mut self.finished);
        done.sort_by_key(|job| job.seq);
        done
    }
}
