//! Handler: processes one input per call on behalf of the dispatch loop.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;

/// Processes one input. Each call runs as its own task on the tokio runtime,
/// concurrently with other inputs from the same loop.
///
/// `stop` is the loop's stop signal. Handlers should watch it and return
/// [`HandlerError::Canceled`] when they abandon work because of it.
#[async_trait]
pub trait Handler<I>: Send + Sync + 'static {
    async fn handle(&self, input: I, stop: CancellationToken) -> Result<(), HandlerError>;
}
