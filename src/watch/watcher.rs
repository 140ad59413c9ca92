// src/watch/watcher.rs

use std::path::PathBuf;

use anyhow::Context;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::OrchestratorEvent;
use crate::errors::Result;
use crate::watch::event::from_notify;

/// Keeps the underlying `RecommendedWatcher` alive; dropping it stops
/// watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `root` recursively and forward every change as
/// `OrchestratorEvent::FileChanged`.
///
/// Only changes after the call are reported; the existing tree is not
/// replayed as adds.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    event_tx: mpsc::Sender<OrchestratorEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or(root);

    // Channel from the blocking notify callback into the async world.
    let (notify_tx, mut notify_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = notify_tx.send(event) {
                    eprintln!("themewatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("themewatch: file watch error: {err}");
            }
        },
        Config::default(),
    )
    .context("creating file watcher")?;

    watcher
        .watch(&root, RecursiveMode::Recursive)
        .with_context(|| format!("watching {:?}", root))?;

    info!("file watcher started on {:?}", root);

    tokio::spawn(async move {
        while let Some(event) = notify_rx.recv().await {
            debug!(?event, "received notify event");
            for fs_event in from_notify(&event) {
                if let Err(err) = event_tx.send(OrchestratorEvent::FileChanged(fs_event)).await {
                    warn!("orchestrator channel closed: {err}");
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}
