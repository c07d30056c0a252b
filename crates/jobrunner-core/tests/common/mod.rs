#![allow(dead_code)]

pub mod scripted;

use std::time::Duration;

/// Poll `cond` until it holds, panicking after a few seconds.
pub async fn eventually(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !cond() {
        if tokio::time::Instant::now() > deadline {
            panic!("timed out waiting for: {}", what);
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}
