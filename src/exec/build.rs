// src/exec/build.rs

//! Bundler process control.
//!
//! The orchestrator talks to a [`BuildController`] rather than to processes
//! directly, so tests can swap in a fake that only records calls.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::config::Config;
use crate::engine::OrchestratorEvent;
use crate::entries::{discover_entrypoints, EntrypointMap};
use crate::errors::{Result, ThemewatchError};
use crate::exec::process::{run_to_completion, shell_command, supervise, ProcessHandle};
use crate::fs::FileSystem;
use crate::types::BuildMode;

/// Environment variable through which the bundler finds the entry manifest.
pub const ENTRYPOINTS_ENV: &str = "THEMEWATCH_ENTRYPOINTS";

/// Starts and restarts the bundler.
///
/// `start` hands back a handle owning the running build; `restart` consumes
/// that handle, brings up a new build, and only then releases the old one.
pub trait BuildController: Send {
    type Handle: Send;

    fn start(
        &mut self,
        mode: BuildMode,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Handle>> + Send + '_>>;

    fn restart(
        &mut self,
        previous: Self::Handle,
        mode: BuildMode,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Handle>> + Send + '_>>;
}

/// Runs the configured bundler command through the platform shell.
///
/// Before each start the entrypoints are rediscovered and the manifest at
/// [`ENTRYPOINTS_ENV`] is rewritten, so added or removed templates reach the
/// bundler.
#[derive(Debug)]
pub struct ShellBuildController {
    fs: Arc<dyn FileSystem>,
    scripts_dir: PathBuf,
    manifest_path: PathBuf,
    watch_cmd: String,
    build_cmd: String,
    event_tx: mpsc::Sender<OrchestratorEvent>,
}

impl ShellBuildController {
    pub fn new(
        cfg: &Config,
        fs: Arc<dyn FileSystem>,
        event_tx: mpsc::Sender<OrchestratorEvent>,
    ) -> Self {
        Self {
            fs,
            scripts_dir: cfg.paths.scripts_dir.clone(),
            manifest_path: cfg.manifest_path(),
            watch_cmd: cfg.build.watch_cmd.clone(),
            build_cmd: cfg.build.build_cmd.clone(),
            event_tx,
        }
    }

    /// Rediscover entrypoints and rewrite the manifest.
    pub fn refresh_manifest(&self) -> Result<EntrypointMap> {
        let entries = discover_entrypoints(self.fs.as_ref(), &self.scripts_dir)?;
        entries.write_manifest(self.fs.as_ref(), &self.manifest_path)?;
        Ok(entries)
    }

    fn command_for(&self, mode: BuildMode) -> tokio::process::Command {
        let cmd = match mode {
            BuildMode::Watch => &self.watch_cmd,
            BuildMode::Build => &self.build_cmd,
        };
        let mut command = shell_command(cmd);
        command.env(ENTRYPOINTS_ENV, &self.manifest_path);
        command
    }

    fn spawn(&self, mode: BuildMode) -> Result<ProcessHandle> {
        self.refresh_manifest()?;
        info!(%mode, "starting bundler");
        supervise("bundler", self.command_for(mode), self.event_tx.clone())
    }

    /// One-off build: refresh the manifest and wait for the bundler to exit.
    ///
    /// Returns the entrypoints the build was run with.
    pub async fn run_once(&self) -> Result<EntrypointMap> {
        let entries = self.refresh_manifest()?;
        match run_to_completion("bundler", self.command_for(BuildMode::Build)).await? {
            Some(0) => Ok(entries),
            code => Err(ThemewatchError::Other(anyhow::anyhow!(
                "bundler exited with status {code:?}"
            ))),
        }
    }
}

impl BuildController for ShellBuildController {
    type Handle = ProcessHandle;

    fn start(
        &mut self,
        mode: BuildMode,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Handle>> + Send + '_>> {
        Box::pin(async move { self.spawn(mode) })
    }

    fn restart(
        &mut self,
        previous: Self::Handle,
        mode: BuildMode,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Handle>> + Send + '_>> {
        Box::pin(async move {
            info!(%mode, "restarting bundler");
            let next = self.spawn(mode)?;
            previous.stop().await;
            Ok(next)
        })
    }
}
