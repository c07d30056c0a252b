//! Stop-signal plumbing for processes that host a dispatch loop.
//!
//! The loop only reads its `CancellationToken`; something outside has to fire
//! it. These helpers wire common triggers to the token.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Fire `stop` on the first Ctrl-C (SIGINT). The returned task ends when the
/// signal arrives or `stop` is fired by someone else.
pub fn stop_on_ctrl_c(stop: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                match res {
                    Ok(()) => {
                        tracing::info!("interrupt received; stopping after in-flight inputs");
                        stop.cancel();
                    }
                    Err(e) => tracing::warn!("could not listen for ctrl-c: {}", e),
                }
            }
            _ = stop.cancelled() => {}
        }
    })
}

/// Fire `stop` after `after` has elapsed (e.g. a run deadline).
pub fn stop_after(stop: CancellationToken, after: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(after) => {
                tracing::info!(?after, "run deadline reached; stopping");
                stop.cancel();
            }
            _ = stop.cancelled() => {}
        }
    })
}
