//! `[export]` section configuration.
//!
//! Where the "Download PDF" button of the preview writes to.
//!
//! ```toml
//! [export]
//! dir = "build"               # relative to project root (default: root)
//! file_name = "thesis.pdf"    # default: <document stem>.pdf
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Export destination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub dir: PathBuf,
    pub file_name: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            file_name: None,
        }
    }
}

impl ExportConfig {
    /// Destination for the artifact of `document`.
    pub fn destination_for(&self, document: &Path) -> PathBuf {
        let name = match &self.file_name {
            Some(name) => name.clone(),
            None => {
                let stem = document
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "document".to_string());
                format!("{stem}.pdf")
            }
        };
        self.dir.join(name)
    }
}
