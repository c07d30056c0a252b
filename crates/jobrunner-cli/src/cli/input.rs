//! Reading inputs for `jobrunner run`: one per non-blank line.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Read inputs from `path`, or stdin when `None`.
pub async fn read_inputs(path: Option<&Path>) -> Result<Vec<String>> {
    let text = match path {
        Some(p) => tokio::fs::read_to_string(p)
            .await
            .with_context(|| format!("read inputs from {}", p.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("read inputs from stdin")?;
            buf
        }
    };
    Ok(parse_lines(&text))
}

pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
