//! Error types for handler outcomes and settings.
//!
//! Collaborator failures (Input Source calls) are plain `anyhow::Error` and
//! propagate out of the run; these types cover the per-input outcomes the
//! loop classifies and the settings it validates.

use std::any::Any;
use std::path::PathBuf;

/// Error returned by a `Handler` for one input.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The handler observed the stop signal and gave up on the input.
    #[error("handler canceled")]
    Canceled,
    /// The handler failed to process the input.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

/// Fault payload reported for an input whose handler terminated abnormally.
#[derive(Debug, thiserror::Error)]
pub enum Fault {
    /// The handler returned an error.
    #[error(transparent)]
    Error(anyhow::Error),
    /// The handler task panicked.
    #[error("handler panicked: {0}")]
    Panic(String),
}

impl Fault {
    /// Build a fault from a panic payload, keeping the message when it is a string.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Fault::Panic(message)
    }
}

/// Error loading or validating `Settings`.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("max_concurrent_inputs must be at least 1")]
    ZeroConcurrency,
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
