//! Config file watcher driving generator reloads.
//!
//! # Responsibilities
//! - Watch the config file's directory so rename-replace saves are seen
//! - Fold a burst of file events into one reload
//! - Deliver only configs that parse, validate and differ from the last one
//!
//! ```text
//! notify thread ──(file touched)──▶ debounce task ──(new SynthConfig)──▶ daemon
//! ```

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

use crate::config::loader::load_config;
use crate::config::schema::SynthConfig;

/// Quiet period after the last file event before the config is re-read.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Watches one config file and sends each distinct valid version of it.
pub struct ConfigWatcher {
    path: PathBuf,
    debounce: Duration,
    update_tx: mpsc::UnboundedSender<SynthConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiver its updates arrive on.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<SynthConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                debounce: DEFAULT_DEBOUNCE,
                update_tx,
            },
            update_rx,
        )
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Start watching. Must be called from within a Tokio runtime.
    ///
    /// Updates stop when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let file_name = self
            .path
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| notify::Error::generic("config path has no file name"))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (touched_tx, touched_rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if touches(&event, &file_name) => {
                    let _ = touched_tx.send(());
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let baseline = load_config(&self.path).ok();
        tokio::spawn(reload_loop(self.path.clone(), self.debounce, baseline, touched_rx, self.update_tx));

        tracing::info!(path = %self.path.display(), debounce_ms = self.debounce.as_millis() as u64, "Config watcher started");
        Ok(watcher)
    }
}

/// Whether `event` may have changed the watched file.
fn touches(event: &Event, file_name: &OsString) -> bool {
    let relevant = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any);
    relevant
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(file_name.as_os_str()))
}

async fn reload_loop(
    path: PathBuf,
    debounce: Duration,
    mut current: Option<SynthConfig>,
    mut touched: mpsc::UnboundedReceiver<()>,
    updates: mpsc::UnboundedSender<SynthConfig>,
) {
    while touched.recv().await.is_some() {
        // Swallow the rest of the burst.
        loop {
            match time::timeout(debounce, touched.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) => return,
                Err(_) => break,
            }
        }

        match load_config(&path) {
            Ok(config) if current.as_ref() == Some(&config) => {
                tracing::debug!(path = %path.display(), "Config file touched but unchanged");
            }
            Ok(config) => {
                tracing::info!(path = %path.display(), "Config file changed, reloading");
                current = Some(config.clone());
                if updates.send(config).is_err() {
                    return;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
            }
        }
    }
}
