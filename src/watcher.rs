//! Re-analyze annotation files as they change on disk

use crate::batch::{self, BatchOptions, FileOutcome};
use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Recursive watcher over an annotation directory.
/// notify delivers events on its own thread; they are forwarded to a channel.
pub struct AnnotationWatcher {
    // Dropping the watcher stops event delivery
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
}

impl AnnotationWatcher {
    pub fn new(root: &Path) -> notify::Result<Self> {
        let (tx, rx) = unbounded::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(move |res| {
            // Send only fails once the receiver is gone, i.e. we are shutting down
            let _ = tx.send(res);
        })?;
        watcher.watch(root, RecursiveMode::Recursive)?;

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Block until something changes, then return every changed annotation
    /// path queued so far. `None` once the event stream ends.
    pub fn next_changes(&self, output_root: &Path) -> Option<BTreeSet<PathBuf>> {
        let first = self.rx.recv().ok()?;
        let mut changed = BTreeSet::new();

        for res in std::iter::once(first).chain(self.rx.try_iter()) {
            match res {
                Ok(event) => changed.extend(rebuild_targets(&event, output_root)),
                Err(e) => log::warn!("watch error: {}", e),
            }
        }
        Some(changed)
    }
}

/// Paths in `event` that should be re-analyzed: created or modified files,
/// excluding hidden files and anything under the report directory.
pub fn rebuild_targets(event: &Event, output_root: &Path) -> Vec<PathBuf> {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return Vec::new();
    }

    event
        .paths
        .iter()
        .filter(|path| !path.starts_with(output_root))
        .filter(|path| !batch::is_hidden(path))
        .cloned()
        .collect()
}

/// Watch `options.input` and rebuild the report of every file that changes.
/// Runs until the watcher's event stream closes.
pub fn run_watch(options: &BatchOptions, top: usize) -> Result<()> {
    let watcher = AnnotationWatcher::new(&options.input)?;
    // notify reports absolute paths
    let output_root = options
        .output
        .canonicalize()
        .unwrap_or_else(|_| options.output.clone());
    log::info!("watching {} for changes", options.input.display());

    while let Some(changed) = watcher.next_changes(&output_root) {
        for path in changed {
            // Editors often write through temp files that vanish immediately
            if !path.is_file() {
                continue;
            }
            let result = batch::process_file(&path, options);
            batch::print_outcome(&FileOutcome { path, result }, top);
        }
    }

    Ok(())
}
