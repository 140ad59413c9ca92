// src/engine/mod.rs

//! Watch orchestration.
//!
//! The pure core state machine lives in [`core`]: it decides, per event,
//! whether a bundler restart is needed or the session should end. The
//! async/IO shell in [`runtime`] owns the event channel, the debounce timer
//! and the [`BuildController`](crate::exec::BuildController).

use std::time::Duration;

use crate::watch::FsEvent;

/// Events flowing into the orchestrator from the watcher, supervised
/// processes and signal handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorEvent {
    /// Something changed under the source root.
    FileChanged(FsEvent),
    /// A supervised process exited on its own.
    ProcessExited {
        process: String,
        code: Option<i32>,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Options for the async shell.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorOptions {
    /// Restart-worthy events within this window collapse into one restart.
    pub debounce: Duration,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
        }
    }
}

pub mod core;
pub mod runtime;

pub use core::{CoreCommand, CoreStep, OrchestratorCore, StopReason};
pub use runtime::Orchestrator;
