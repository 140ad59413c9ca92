// src/engine/core.rs

//! Pure core of the watch orchestrator.
//!
//! Consumes [`OrchestratorEvent`]s and returns the commands the IO shell
//! should carry out. No channels, timers or processes live here, so it can be
//! tested synchronously.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use tracing::debug;

use crate::engine::OrchestratorEvent;
use crate::watch::{FsEventKind, RestartFilter};

/// Command produced by the core, executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Arm the debounce timer; restart the bundler when it fires.
    ScheduleRestart,
}

/// Why the orchestrator stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    ProcessExited { process: String, code: Option<i32> },
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// `Some` when the outer loop should stop.
    pub stop: Option<StopReason>,
}

impl CoreStep {
    pub fn idle() -> Self {
        Self {
            commands: Vec::new(),
            stop: None,
        }
    }
}

/// Tracks which files exist under the entry directories and decides when
/// the bundler has to be restarted.
///
/// Editors often save by replacing a file (rename a temp file over it, or
/// move the original aside and write it again). Those arrive as adds and
/// unlinks, but leave the set of files unchanged: an add of a known file is
/// ignored, and an unlink followed by a re-add within one debounce window
/// cancels out.
#[derive(Debug)]
pub struct OrchestratorCore {
    filter: RestartFilter,
    known: HashSet<PathBuf>,
    /// Net file-set changes since the last restart.
    changes: BTreeMap<PathBuf, FsEventKind>,
    restart_pending: bool,
    restarts_dispatched: u64,
}

impl OrchestratorCore {
    pub fn new(filter: RestartFilter) -> Self {
        Self {
            filter,
            known: HashSet::new(),
            changes: BTreeMap::new(),
            restart_pending: false,
            restarts_dispatched: 0,
        }
    }

    /// Seed the files present when watching starts.
    pub fn with_known_files(mut self, files: impl IntoIterator<Item = PathBuf>) -> Self {
        self.known.extend(files);
        self
    }

    pub fn restart_pending(&self) -> bool {
        self.restart_pending
    }

    pub fn restarts_dispatched(&self) -> u64 {
        self.restarts_dispatched
    }

    /// Handle one event.
    ///
    /// While a restart is already scheduled, further restart-worthy events
    /// are absorbed into it.
    pub fn step(&mut self, event: OrchestratorEvent) -> CoreStep {
        match event {
            OrchestratorEvent::FileChanged(fs_event) => {
                let Some(path) = self.filter.watched_path(&fs_event) else {
                    return CoreStep::idle();
                };
                let file_set_changed = match fs_event.kind {
                    FsEventKind::Add => self.known.insert(path.clone()),
                    FsEventKind::Unlink => self.known.remove(&path),
                    _ => false,
                };
                if !file_set_changed {
                    debug!(kind = ?fs_event.kind, path = ?path, "file set unchanged; ignoring");
                    return CoreStep::idle();
                }
                if self.changes.remove(&path).is_none() {
                    self.changes.insert(path, fs_event.kind);
                }
                if self.restart_pending {
                    debug!(path = ?fs_event.path, "restart already scheduled; coalescing");
                    return CoreStep::idle();
                }
                debug!(kind = ?fs_event.kind, path = ?fs_event.path, "entry set changed; scheduling restart");
                self.restart_pending = true;
                CoreStep {
                    commands: vec![CoreCommand::ScheduleRestart],
                    stop: None,
                }
            }
            OrchestratorEvent::ProcessExited { process, code } => CoreStep {
                commands: Vec::new(),
                stop: Some(StopReason::ProcessExited { process, code }),
            },
            OrchestratorEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                stop: Some(StopReason::Shutdown),
            },
        }
    }

    /// The debounce timer fired. Returns whether the bundler must restart;
    /// `false` when every change in the window was undone.
    ///
    /// Later events may schedule another restart either way.
    pub fn take_restart(&mut self) -> bool {
        self.restart_pending = false;
        if self.changes.is_empty() {
            return false;
        }
        debug!(changes = ?self.changes, "restarting for file set changes");
        self.changes.clear();
        self.restarts_dispatched += 1;
        true
    }
}
