//! `[preview]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [preview]
//! update_delay = 1000          # ms of quiet before recompiling
//! temp_dir = ".texmex-temp"    # per-session work directories live here
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Preview pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Debounce duration in milliseconds.
    pub update_delay: u64,

    /// Root of per-session work directories (relative to project root).
    pub temp_dir: PathBuf,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            update_delay: 1000,
            temp_dir: PathBuf::from(".texmex-temp"),
        }
    }
}

impl PreviewConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.update_delay)
    }
}
