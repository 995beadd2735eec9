//! Engine configuration.
//!
//! Defaults work out of the box; a TOML file can override any subset of
//! fields, and the CLI layers its own overrides on top.

use crate::error::Result;
use anyhow::Context;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tokio::time::Duration;

/// Tunables for the search engine and session controller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding one `<bucket>.json` asset per bucket key.
    pub shard_dir: PathBuf,
    /// Quiet window after the last keystroke before a match runs.
    pub debounce_ms: u64,
    /// Bound on a single shard load; exceeding it records a load failure.
    pub load_timeout_ms: u64,
    /// Cap on ranked groups returned per query. Truncation is tail-only.
    pub max_results: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shard_dir: PathBuf::from("search"),
            debounce_ms: 150,
            load_timeout_ms: 3000,
            max_results: 50,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file, or defaults when `path` is None.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let expanded = expand_tilde(&path.to_string_lossy()).into_owned();
        let content = std::fs::read_to_string(&expanded)
            .with_context(|| format!("Failed to read config file {}", expanded))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", expanded))?;
        Ok(config)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
///
/// Returns `Cow::Borrowed` if no expansion needed, `Cow::Owned` if expanded.
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
