//! Follows the config file and repoints the live ledger handle.
//!
//! Only the `[ledger]` section takes effect after startup. Signer,
//! confirmation and logging settings are read once.

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::loader::load_config;
use crate::ledger::handle::LedgerHandle;

/// What a reload did to the handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A client for the new endpoint was swapped in.
    Applied,
    /// The ledger section did not change.
    Unchanged,
    /// The file could not be used; the current client stays.
    Rejected(String),
}

/// Re-reads one config file and hands its ledger section to a handle.
pub struct ConfigWatcher {
    path: PathBuf,
    handle: Arc<LedgerHandle>,
}

impl ConfigWatcher {
    pub fn new(path: &Path, handle: Arc<LedgerHandle>) -> Self {
        Self {
            path: path.to_path_buf(),
            handle,
        }
    }

    /// Load the file now and apply its ledger section.
    pub fn reload(&self) -> ReloadOutcome {
        let outcome = match load_config(&self.path) {
            Ok(config) => match self.handle.reconfigure(config.ledger) {
                Ok(true) => ReloadOutcome::Applied,
                Ok(false) => ReloadOutcome::Unchanged,
                Err(e) => ReloadOutcome::Rejected(e.to_string()),
            },
            Err(e) => ReloadOutcome::Rejected(e.to_string()),
        };

        match &outcome {
            ReloadOutcome::Applied => {
                tracing::info!(path = %self.path.display(), "Ledger endpoint reloaded")
            }
            ReloadOutcome::Unchanged => {
                tracing::debug!(path = %self.path.display(), "Config touched, ledger unchanged")
            }
            ReloadOutcome::Rejected(reason) => tracing::warn!(
                path = %self.path.display(),
                reason = %reason,
                "Ignoring config change, keeping current endpoint"
            ),
        }
        outcome
    }

    fn concerns_file(&self, event: &Event) -> bool {
        let relevant_kind = matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_)
        );
        relevant_kind
            && event
                .paths
                .iter()
                .any(|p| p.file_name() == self.path.file_name())
    }

    /// Start watching. The returned notify watcher must be kept alive.
    ///
    /// The parent directory is watched so editors that replace the file
    /// on save are still followed.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let directory = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let path = self.path.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if self.concerns_file(&event) => {
                    self.reload();
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch failed"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %path.display(), "Watching config for ledger changes");
        Ok(watcher)
    }
}
