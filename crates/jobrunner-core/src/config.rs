use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;

const DEFAULT_MAX_CONCURRENT_INPUTS: usize = 4;

/// Settings for one dispatch loop, loaded from `~/.config/jobrunner/config.toml`.
/// Fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Maximum number of inputs in flight at once.
    pub max_concurrent_inputs: NonZeroUsize,
}

impl Settings {
    /// Settings with the given concurrency cap; 0 is rejected.
    pub fn new(max_concurrent_inputs: usize) -> Result<Self, SettingsError> {
        NonZeroUsize::new(max_concurrent_inputs)
            .map(|max_concurrent_inputs| Self {
                max_concurrent_inputs,
            })
            .ok_or(SettingsError::ZeroConcurrency)
    }

    pub fn max_concurrent_inputs(&self) -> usize {
        self.max_concurrent_inputs.get()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_concurrent_inputs: NonZeroUsize::new(DEFAULT_MAX_CONCURRENT_INPUTS)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("jobrunner")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load settings from `path`.
pub fn load_from_path(path: &Path) -> Result<Settings, SettingsError> {
    let data = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&data).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load settings from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<Settings> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = Settings::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    Ok(load_from_path(&path)?)
}
