// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info};

use crate::engine::core::{CoreCommand, OrchestratorCore, StopReason};
use crate::engine::{OrchestratorEvent, OrchestratorOptions};
use crate::errors::{Result, ThemewatchError};
use crate::exec::BuildController;
use crate::types::BuildMode;

/// Drives the bundler in response to [`OrchestratorEvent`]s.
///
/// This is the IO shell around [`OrchestratorCore`]: it reads events, arms
/// the debounce timer the core asks for, and performs restarts one at a time
/// through the [`BuildController`].
pub struct Orchestrator<B: BuildController> {
    core: OrchestratorCore,
    event_rx: mpsc::Receiver<OrchestratorEvent>,
    controller: B,
    options: OrchestratorOptions,
}

impl<B: BuildController> fmt::Debug for Orchestrator<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("core", &self.core)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

enum Next {
    Event(Option<OrchestratorEvent>),
    RestartDue,
}

impl<B: BuildController> Orchestrator<B> {
    pub fn new(
        core: OrchestratorCore,
        event_rx: mpsc::Receiver<OrchestratorEvent>,
        controller: B,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            core,
            event_rx,
            controller,
            options,
        }
    }

    /// Start the bundler in watch mode and react to events until shutdown.
    ///
    /// Returns an error when a supervised process exits on its own or the
    /// controller fails to (re)start the build. Returns the controller on a
    /// clean stop, which lets callers inspect it.
    pub async fn run(mut self) -> Result<B> {
        let mut build = Some(self.controller.start(BuildMode::Watch).await?);
        info!("orchestrator started");

        let mut restart_at: Option<Instant> = None;

        loop {
            let next = match restart_at {
                Some(deadline) => tokio::select! {
                    event = self.event_rx.recv() => Next::Event(event),
                    _ = sleep_until(deadline) => Next::RestartDue,
                },
                None => Next::Event(self.event_rx.recv().await),
            };

            let event = match next {
                Next::RestartDue => {
                    restart_at = None;
                    if !self.core.take_restart() {
                        debug!("file set back to where it was; skipping restart");
                        continue;
                    }
                    if let Some(previous) = build.take() {
                        build = Some(self.controller.restart(previous, BuildMode::Watch).await?);
                    }
                    continue;
                }
                Next::Event(Some(event)) => event,
                Next::Event(None) => {
                    info!("orchestrator event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "orchestrator received event");
            let step = self.core.step(event);

            for command in step.commands {
                match command {
                    CoreCommand::ScheduleRestart => {
                        restart_at.get_or_insert_with(|| Instant::now() + self.options.debounce);
                    }
                }
            }

            match step.stop {
                None => {}
                Some(StopReason::Shutdown) => {
                    info!("shutdown requested; stopping orchestrator");
                    break;
                }
                Some(StopReason::ProcessExited { process, code }) => {
                    error!(process = %process, exit_code = ?code, "supervised process exited; stopping");
                    return Err(ThemewatchError::Other(anyhow::anyhow!(
                        "process '{process}' exited with status {code:?}"
                    )));
                }
            }
        }

        drop(build);
        Ok(self.controller)
    }
}
