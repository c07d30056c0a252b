//! Input Source: where the dispatch loop pulls inputs from and reports outcomes to.

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Fault;

/// Supplies inputs to the dispatch loop and receives one outcome per dispatched input.
///
/// Multiple inputs from one loop are in flight at once, so implementations must be
/// safe to call concurrently with their own handler work. Identity of inputs is the
/// source's concern; the loop never inspects them.
///
/// Any error returned here is fatal to the run and propagates out of
/// [`JobRunner::run`](crate::runner::JobRunner::run).
#[async_trait]
pub trait InputSource<I>: Send + Sync {
    /// Next input if one is available right now. Must not block indefinitely.
    async fn get_next_input(&self) -> Result<Option<I>>;

    /// Wait until an input is available. Returns `None` when `stop` fires or the
    /// source will never produce another input; the loop then stops fetching.
    /// Only called while no inputs are in flight.
    async fn wait_for_next_input(&self, stop: &CancellationToken) -> Result<Option<I>>;

    /// The handler for `input` succeeded.
    async fn complete_input(&self, input: I) -> Result<()>;

    /// The handler for `input` failed or panicked.
    async fn handle_exception_for_input(&self, input: I, fault: Fault) -> Result<()>;

    /// The handler for `input` was canceled.
    async fn handle_canceled_input(&self, input: I) -> Result<()>;
}
