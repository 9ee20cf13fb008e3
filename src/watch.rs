//! Re-run checks when list files change.
//!
//! Watcher callbacks run on notify's thread and forward events over an
//! unbounded channel to the async check loop.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

const DEBOUNCE: Duration = Duration::from_millis(250);

/// Events from the file watcher
#[derive(Debug)]
enum WatcherEvent {
    ListChanged(PathBuf),
    WatcherError(notify::Error),
}

/// Watches list files and directories for modifications
pub struct ListWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<WatcherEvent>,
}

impl ListWatcher {
    pub fn new(targets: &[PathBuf]) -> Result<Self> {
        // notify reports absolute paths, so targets are matched in the same form
        let targets = targets
            .iter()
            .map(|target| absolute_target(target))
            .collect::<Result<Vec<_>>>()?;

        let (tx, rx) = mpsc::unbounded_channel();
        let filter = targets.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if let EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) =
                        event.kind
                    {
                        for path in event.paths {
                            if is_relevant(&path, &filter) {
                                let _ = tx.send(WatcherEvent::ListChanged(path));
                            }
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatcherEvent::WatcherError(e));
                }
            },
            NotifyConfig::default().with_poll_interval(Duration::from_secs(1)),
        )?;

        for target in &targets {
            // Files are watched through their directory so editors that
            // replace the file on save keep triggering events
            let (dir, mode) = if target.is_dir() {
                (target.as_path(), RecursiveMode::Recursive)
            } else {
                (
                    target.parent().unwrap_or_else(|| Path::new(".")),
                    RecursiveMode::NonRecursive,
                )
            };
            watcher
                .watch(dir, mode)
                .with_context(|| format!("Failed to watch {}", dir.display()))?;
        }

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Wait for the next relevant change, coalescing bursts of events
    pub async fn next_change(&mut self) -> Option<PathBuf> {
        loop {
            match self.rx.recv().await? {
                WatcherEvent::ListChanged(path) => {
                    tokio::time::sleep(DEBOUNCE).await;
                    while self.rx.try_recv().is_ok() {}
                    return Some(path);
                }
                WatcherEvent::WatcherError(e) => {
                    log::error!("List file watcher error: {}", e);
                }
            }
        }
    }
}

/// Resolve a watch target to an absolute path
///
/// Existing paths are canonicalized so they match the paths notify reports
/// after symlinks such as `/var -> /private/var`.
pub fn absolute_target(path: &Path) -> Result<PathBuf> {
    match std::fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(_) => std::path::absolute(path)
            .with_context(|| format!("Failed to resolve {}", path.display())),
    }
}

/// A changed path matters if it is a watched file or a checklist inside a
/// watched directory
pub fn is_relevant(path: &Path, targets: &[PathBuf]) -> bool {
    targets.iter().any(|target| {
        path == target
            || (path.starts_with(target)
                && path.extension().and_then(|s| s.to_str()) == Some("txt"))
    })
}

/// Run `rerun` once, then again after every change until Ctrl-C
pub async fn watch_loop<F>(targets: &[PathBuf], mut rerun: F) -> Result<()>
where
    F: FnMut() -> Result<()>,
{
    let mut watcher = ListWatcher::new(targets)?;
    rerun()?;
    log::info!(
        "Watching {} path(s) for changes, press Ctrl-C to stop",
        targets.len()
    );

    loop {
        tokio::select! {
            changed = watcher.next_change() => match changed {
                Some(path) => {
                    log::info!("List changed: {}", path.display());
                    rerun()?;
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                log::info!("Stopping watch");
                break;
            }
        }
    }

    Ok(())
}
