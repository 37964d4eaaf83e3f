//! File-watch host: coalesces change notifications into periodic reorder
//! passes.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::app::trigger::ReorderTrigger;
use crate::infra::buffer::{FileBuffer, ReorderStatus, reorder_active};
use crate::infra::config::Config;
use crate::infra::policy::PolicyLookup;

/// Shared state between the watcher callback and the periodic pass: the
/// coalescing trigger plus the set of paths touched since the last pass.
pub struct WatchService {
    trigger: Arc<ReorderTrigger>,
    dirty: Mutex<BTreeSet<PathBuf>>,
    policy: PolicyLookup,
    config: Config,
}

impl WatchService {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            trigger: Arc::new(ReorderTrigger::new()),
            dirty: Mutex::new(BTreeSet::new()),
            policy: PolicyLookup::from_config(&config.policy)?,
            config,
        })
    }

    /// Record a touched path and arm the trigger. Called from watcher
    /// callbacks; any number of calls collapse into one pending pass.
    pub fn mark_changed(&self, path: PathBuf) {
        self.dirty.lock().insert(path);
        self.trigger.mark_pending();
    }

    /// Run one reorder pass if the trigger is armed. Returns how many
    /// files actually changed. Per-file failures are logged and skipped so
    /// a deleted file cannot stop the loop.
    pub fn run_pending_pass(&self) -> usize {
        if !self.trigger.consume_if_pending() {
            return 0;
        }

        let paths: Vec<PathBuf> = std::mem::take(&mut *self.dirty.lock()).into_iter().collect();
        let mut changed = 0;
        for path in paths {
            if !self.policy.allows(&path) {
                debug!(path = %path.display(), "document disabled by policy, skipping");
                continue;
            }
            let mut buffer = FileBuffer::new(&path);
            match reorder_active(Some(&mut buffer), &self.config.rules) {
                Ok(ReorderStatus::Changed) => changed += 1,
                Ok(_) => {}
                Err(err) => warn!(path = %path.display(), error = %err, "reorder pass failed"),
            }
        }
        changed
    }

    pub fn is_pending(&self) -> bool {
        self.trigger.is_pending()
    }
}

fn is_content_event(event: &Event) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
}

/// Watch the given files and reorder them on a fixed interval whenever a
/// change notification arrived since the previous tick. Runs until the
/// process is interrupted.
pub fn watch_files(paths: &[PathBuf], config: Config) -> Result<()> {
    let interval = Duration::from_secs(config.watch.interval_seconds.max(1));
    let service = Arc::new(WatchService::new(config)?);

    let callback_service = Arc::clone(&service);
    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        match result {
            Ok(event) if is_content_event(&event) => {
                for path in event.paths {
                    callback_service.mark_changed(path);
                }
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "file watcher error"),
        }
    })
    .context("failed to create file watcher")?;

    for path in paths {
        watcher
            .watch(Path::new(path), RecursiveMode::NonRecursive)
            .with_context(|| format!("failed to watch {}", path.display()))?;
        // Settle files that were already out of order before the first
        // notification arrives.
        service.mark_changed(path.clone());
    }

    loop {
        service.run_pending_pass();
        thread::sleep(interval);
    }
}
