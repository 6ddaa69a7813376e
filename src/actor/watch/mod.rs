//! Watch Actor
//!
//! Watches the documents given on the command line and submits their full
//! text to the pipeline whenever the content on disk changes. Timing is
//! left to the debounce actor.
//!
//! ```text
//! notify (parent dirs) -> filter to documents -> content hash -> PipelineMsg::Change
//! ```

use std::path::{Path, PathBuf};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::{FxHashMap, FxHashSet};
use tokio::sync::mpsc;

use super::messages::PipelineMsg;
use crate::utils::hash;
use crate::utils::path::normalize_path;

/// Last seen content hash per watched document.
struct Tracker {
    hashes: FxHashMap<PathBuf, u64>,
}

impl Tracker {
    /// Track `documents` (normalized), seeding hashes from disk.
    fn new(documents: &[PathBuf]) -> Self {
        let hashes = documents
            .iter()
            .map(|doc| {
                let seed = std::fs::read(doc).map(|b| hash::compute(&b)).unwrap_or(0);
                (doc.clone(), seed)
            })
            .collect();
        Self { hashes }
    }

    fn is_tracked(&self, path: &Path) -> bool {
        self.hashes.contains_key(path)
    }

    /// New text of `path` if it differs from what was last seen.
    fn observe(&mut self, path: &Path) -> Option<String> {
        let known = self.hashes.get_mut(path)?;
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                crate::debug!("watch"; "unreadable {}: {}", path.display(), e);
                return None;
            }
        };
        let current = hash::compute(&text);
        if current == *known {
            return None;
        }
        *known = current;
        Some(text)
    }
}

/// Content may have changed. Metadata-only noise (mtime/atime/chmod) is skipped.
fn is_content_event(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) => true,
        EventKind::Modify(modify) => !matches!(modify, notify::event::ModifyKind::Metadata(_)),
        _ => false,
    }
}

/// Watch Actor - turns saves into change messages
pub struct WatchActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    _watcher: RecommendedWatcher,
    tracker: Tracker,
    pipeline_tx: mpsc::Sender<PipelineMsg>,
}

impl WatchActor {
    /// Start watching immediately so saves made during startup are buffered.
    pub fn new(
        documents: &[PathBuf],
        pipeline_tx: mpsc::Sender<PipelineMsg>,
    ) -> notify::Result<Self> {
        let documents: Vec<PathBuf> = documents.iter().map(|d| normalize_path(d)).collect();
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        // Editors often save by rename, so watch the directory, not the file
        let dirs: FxHashSet<&Path> = documents.iter().filter_map(|d| d.parent()).collect();
        for dir in dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
            crate::debug!("watch"; "watching {}", dir.display());
        }

        Ok(Self {
            notify_rx,
            _watcher: watcher,
            tracker: Tracker::new(&documents),
            pipeline_tx,
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let Self {
            notify_rx,
            _watcher,
            mut tracker,
            pipeline_tx,
        } = self;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        while let Some(event) = async_rx.recv().await {
            if !is_content_event(&event.kind) {
                continue;
            }
            crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);

            for path in &event.paths {
                let path = normalize_path(path);
                if !tracker.is_tracked(&path) {
                    continue;
                }
                let Some(text) = tracker.observe(&path) else {
                    continue;
                };

                crate::debug!("watch"; "changed {}", path.display());
                let msg = PipelineMsg::Change {
                    document: path,
                    text,
                };
                if pipeline_tx.send(msg).await.is_err() {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, ModifyKind};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_content_events() {
        assert!(is_content_event(&EventKind::Create(CreateKind::File)));
        assert!(is_content_event(&EventKind::Modify(ModifyKind::Data(
            DataChange::Content
        ))));
        assert!(!is_content_event(&EventKind::Modify(ModifyKind::Metadata(
            MetadataKind::WriteTime
        ))));
        assert!(!is_content_event(&EventKind::Remove(
            notify::event::RemoveKind::File
        )));
    }

    #[test]
    fn test_tracker_skips_unchanged_content() {
        let dir = TempDir::new().unwrap();
        let doc = normalize_path(&dir.path().join("main.tex"));
        fs::write(&doc, "v1").unwrap();
        let mut tracker = Tracker::new(std::slice::from_ref(&doc));

        // initial content was seeded
        assert_eq!(tracker.observe(&doc), None);

        fs::write(&doc, "v2").unwrap();
        assert_eq!(tracker.observe(&doc).as_deref(), Some("v2"));
        assert_eq!(tracker.observe(&doc), None);
    }

    #[test]
    fn test_tracker_ignores_other_files() {
        let dir = TempDir::new().unwrap();
        let doc = normalize_path(&dir.path().join("main.tex"));
        let other = dir.path().join("main.aux");
        fs::write(&doc, "v1").unwrap();
        fs::write(&other, "aux").unwrap();
        let mut tracker = Tracker::new(std::slice::from_ref(&doc));

        let other = normalize_path(&other);
        assert!(!tracker.is_tracked(&other));
        assert_eq!(tracker.observe(&other), None);
    }

    #[test]
    fn test_tracker_reports_created_document() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("later.tex");
        let mut tracker = Tracker::new(std::slice::from_ref(&doc));

        fs::write(&doc, "\\section{Late}").unwrap();
        assert_eq!(tracker.observe(&doc).as_deref(), Some("\\section{Late}"));
    }
}
