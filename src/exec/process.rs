// src/exec/process.rs

//! Spawning and supervising child processes.

use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::engine::OrchestratorEvent;
use crate::errors::Result;

/// Build a shell command appropriate for the platform.
pub fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    }
}

/// Spawn `cmd` with piped output forwarded to `tracing`.
///
/// stdout lines are logged at `info`, stderr at `debug`, both tagged with
/// `process = name`. The child is killed when its handle is dropped.
pub fn spawn_logged(name: &str, mut cmd: Command) -> Result<Child> {
    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process '{name}'"))?;

    if let Some(stdout) = child.stdout.take() {
        let process = name.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(process = %process, "{}", line);
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        let process = name.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(process = %process, "stderr: {}", line);
            }
        });
    }

    Ok(child)
}

/// Kills the whole process group led by a supervised child when dropped.
///
/// The child is started as a group leader, so anything the shell wrapper
/// launched (`npx` and the bundler under it) shares its group id.
#[derive(Debug)]
struct ProcessGroup {
    name: String,
    pgid: Option<u32>,
}

impl ProcessGroup {
    fn new(name: &str, pgid: Option<u32>) -> Self {
        Self {
            name: name.to_string(),
            pgid,
        }
    }

    fn kill(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            kill_group(&self.name, pgid);
        }
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(unix)]
fn isolate_group(cmd: &mut Command) {
    cmd.process_group(0);
}

#[cfg(not(unix))]
fn isolate_group(_cmd: &mut Command) {}

#[cfg(unix)]
fn kill_group(name: &str, pgid: u32) {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pgid) else {
        warn!(process = %name, pgid, "process group id out of range");
        return;
    };
    match killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        Ok(()) => debug!(process = %name, pgid, "killed process group"),
        Err(Errno::ESRCH) => {}
        Err(err) => warn!(process = %name, pgid, error = %err, "failed to kill process group"),
    }
}

#[cfg(not(unix))]
fn kill_group(_name: &str, _pgid: u32) {}

/// A supervised long-lived child process.
///
/// If the process exits on its own, an `OrchestratorEvent::ProcessExited` is
/// sent. Stopping it through [`ProcessHandle::stop`], or dropping the handle,
/// kills its whole process group without reporting an exit.
#[derive(Debug)]
pub struct ProcessHandle {
    name: String,
    cancel: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
}

impl ProcessHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Kill the process and wait for its supervisor to finish.
    pub async fn stop(mut self) {
        if let Some(cancel) = self.cancel.take() {
            if cancel.send(()).is_err() {
                debug!(process = %self.name, "process already finished while stopping");
            }
        }
        if let Err(err) = self.join.await {
            warn!(process = %self.name, error = %err, "process supervisor panicked");
        }
    }
}

/// Spawn `cmd` and watch it in a background task.
pub fn supervise(
    name: &str,
    mut cmd: Command,
    event_tx: mpsc::Sender<OrchestratorEvent>,
) -> Result<ProcessHandle> {
    isolate_group(&mut cmd);
    let mut child = spawn_logged(name, cmd)?;
    info!(process = %name, pid = ?child.id(), "process started");
    let mut group = ProcessGroup::new(name, child.id());

    let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
    let process = name.to_string();

    let join = tokio::spawn(async move {
        tokio::select! {
            status = child.wait() => {
                let code = match status {
                    Ok(status) => status.code(),
                    Err(err) => {
                        error!(process = %process, error = %err, "failed waiting for process");
                        None
                    }
                };
                warn!(process = %process, exit_code = ?code, "process exited");
                group.kill();
                let _ = event_tx
                    .send(OrchestratorEvent::ProcessExited { process, code })
                    .await;
            }
            cancel = &mut cancel_rx => {
                if cancel.is_ok() {
                    info!(process = %process, "stopping process");
                } else {
                    debug!(process = %process, "process handle dropped; stopping process");
                }
                group.kill();
                if let Err(err) = child.kill().await {
                    warn!(process = %process, error = %err, "failed to reap process");
                }
            }
        }
    });

    Ok(ProcessHandle {
        name: name.to_string(),
        cancel: Some(cancel_tx),
        join,
    })
}

/// Run `cmd` to completion, returning its exit code.
pub async fn run_to_completion(name: &str, cmd: Command) -> Result<Option<i32>> {
    let mut child = spawn_logged(name, cmd)?;
    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process '{name}'"))?;
    info!(process = %name, exit_code = ?status.code(), success = status.success(), "process finished");
    Ok(status.code())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn run_to_completion_reports_exit_code() {
        let code = run_to_completion("test", shell_command("exit 3")).await.unwrap();
        assert_eq!(code, Some(3));
    }

    #[tokio::test]
    async fn supervised_exit_is_reported() {
        let (tx, mut rx) = mpsc::channel(4);
        let _handle = supervise("short", shell_command("true"), tx).unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for exit event");
        match event {
            Some(OrchestratorEvent::ProcessExited { process, code }) => {
                assert_eq!(process, "short");
                assert_eq!(code, Some(0));
            }
            other => panic!("expected ProcessExited, got {other:?}"),
        }
    }

    fn running(args: &str) -> usize {
        let out = std::process::Command::new("ps")
            .args(["-eo", "args"])
            .output()
            .expect("ps should run");
        String::from_utf8_lossy(&out.stdout)
            .lines()
            .filter(|line| line.trim() == args)
            .count()
    }

    async fn wait_until_started(args: &str) {
        for _ in 0..100 {
            if running(args) > 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("`{args}` never started");
    }

    async fn wait_until_gone(args: &str) -> usize {
        for _ in 0..100 {
            if running(args) == 0 {
                return 0;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        running(args)
    }

    #[tokio::test]
    async fn stop_kills_processes_started_by_the_shell() {
        let (tx, _rx) = mpsc::channel(4);
        let handle = supervise("nested", shell_command("sleep 4711 ; true"), tx).unwrap();
        wait_until_started("sleep 4711").await;

        handle.stop().await;

        assert_eq!(wait_until_gone("sleep 4711").await, 0);
    }

    #[tokio::test]
    async fn dropped_handle_kills_processes_started_by_the_shell() {
        let (tx, _rx) = mpsc::channel(4);
        let handle = supervise("nested", shell_command("sleep 4712 ; true"), tx).unwrap();
        wait_until_started("sleep 4712").await;

        drop(handle);

        assert_eq!(wait_until_gone("sleep 4712").await, 0);
    }

    #[tokio::test]
    async fn stopped_process_does_not_report_exit() {
        let (tx, mut rx) = mpsc::channel(4);
        let handle = supervise("long", shell_command("sleep 30"), tx).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle.stop())
            .await
            .expect("stop timed out");

        assert!(rx.try_recv().is_err());
    }
}
