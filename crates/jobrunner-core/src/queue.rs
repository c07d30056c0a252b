//! In-memory Input Source backed by a FIFO queue.
//!
//! Producers `push` inputs from anywhere; the dispatch loop drains them. `close`
//! marks the queue finished so a waiting loop returns once the queue is empty.
//! Canceled inputs can optionally be put back on the queue so a later run picks
//! them up again.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::error::Fault;
use crate::source::InputSource;

/// Outcome counters kept by a [`QueueSource`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub fetched: u64,
    pub completed: u64,
    pub faulted: u64,
    pub canceled: u64,
    /// Canceled inputs put back on the queue.
    pub requeued: u64,
}

struct QueueState<I> {
    pending: VecDeque<I>,
    closed: bool,
    stats: QueueStats,
}

pub struct QueueSource<I> {
    state: Mutex<QueueState<I>>,
    notify: Notify,
    requeue_canceled: bool,
}

impl<I> Default for QueueSource<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> QueueSource<I> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                pending: VecDeque::new(),
                closed: false,
                stats: QueueStats::default(),
            }),
            notify: Notify::new(),
            requeue_canceled: false,
        }
    }

    /// Queue pre-filled with `inputs`, still open for more.
    pub fn from_inputs(inputs: impl IntoIterator<Item = I>) -> Self {
        let source = Self::new();
        source.lock().pending.extend(inputs);
        source
    }

    /// Put canceled inputs back at the end of the queue instead of dropping them.
    pub fn with_requeue_canceled(mut self, requeue: bool) -> Self {
        self.requeue_canceled = requeue;
        self
    }

    fn lock(&self) -> MutexGuard<'_, QueueState<I>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue an input. Returns it back if the queue is closed.
    pub fn push(&self, input: I) -> Result<(), I> {
        {
            let mut state = self.lock();
            if state.closed {
                return Err(input);
            }
            state.pending.push_back(input);
        }
        self.notify.notify_one();
        Ok(())
    }

    /// No more inputs will be pushed. Inputs already queued are still handed out.
    pub fn close(&self) {
        self.lock().closed = true;
        self.notify.notify_one();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of queued inputs not yet fetched.
    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().pending.is_empty()
    }

    pub fn stats(&self) -> QueueStats {
        self.lock().stats
    }

    /// Remove and return everything still queued.
    pub fn take_pending(&self) -> Vec<I> {
        self.lock().pending.drain(..).collect()
    }

    fn pop(&self) -> Option<I> {
        let mut state = self.lock();
        let input = state.pending.pop_front()?;
        state.stats.fetched += 1;
        Some(input)
    }
}

#[async_trait]
impl<I: Send + 'static> InputSource<I> for QueueSource<I> {
    async fn get_next_input(&self) -> Result<Option<I>> {
        Ok(self.pop())
    }

    async fn wait_for_next_input(&self, stop: &CancellationToken) -> Result<Option<I>> {
        loop {
            if let Some(input) = self.pop() {
                return Ok(Some(input));
            }
            if self.is_closed() {
                tracing::debug!("queue closed and empty");
                return Ok(None);
            }
            tokio::select! {
                _ = self.notify.notified() => {}
                _ = stop.cancelled() => return Ok(None),
            }
        }
    }

    async fn complete_input(&self, _input: I) -> Result<()> {
        self.lock().stats.completed += 1;
        Ok(())
    }

    async fn handle_exception_for_input(&self, _input: I, fault: Fault) -> Result<()> {
        tracing::warn!(error = %fault, "queued input failed");
        self.lock().stats.faulted += 1;
        Ok(())
    }

    async fn handle_canceled_input(&self, input: I) -> Result<()> {
        let mut state = self.lock();
        state.stats.canceled += 1;
        if self.requeue_canceled {
            state.pending.push_back(input);
            state.stats.requeued += 1;
        }
        Ok(())
    }
}
