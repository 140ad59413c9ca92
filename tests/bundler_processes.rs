#![cfg(unix)]

mod common;
use crate::common::builders::ThemeTreeBuilder;
use crate::common::init_tracing;

use std::error::Error;
use std::sync::Arc;

use tokio::sync::mpsc;

use themewatch::config::{Config, RawConfig};
use themewatch::exec::{BuildController, ShellBuildController};
use themewatch::types::BuildMode;
use themewatch_test_utils::{count_processes, wait_for_exit, wait_for_processes};

type TestResult = Result<(), Box<dyn Error>>;

fn controller(watch_cmd: &str) -> Result<ShellBuildController, Box<dyn Error>> {
    let mut raw = RawConfig::default();
    raw.build.watch_cmd = watch_cmd.to_string();
    let cfg = Config::try_from(raw)?;

    let fs = ThemeTreeBuilder::new().layout("theme").build_mock();
    let (tx, _rx) = mpsc::channel(8);
    Ok(ShellBuildController::new(&cfg, Arc::new(fs), tx))
}

#[tokio::test]
async fn restart_and_stop_leave_no_bundler_behind() -> TestResult {
    init_tracing();

    // `; true` keeps the shell around as a parent instead of exec'ing.
    let mut bundler = controller("sleep 4242 ; true")?;

    let first = bundler.start(BuildMode::Watch).await?;
    wait_for_processes("sleep 4242", 1).await;

    let second = bundler.restart(first, BuildMode::Watch).await?;
    // The new bundler is up and the old one is gone.
    assert_eq!(wait_for_count("sleep 4242", 1).await, 1);

    second.stop().await;
    assert_eq!(wait_for_exit("sleep 4242").await, 0);
    Ok(())
}

#[tokio::test]
async fn dropping_the_build_handle_kills_the_bundler() -> TestResult {
    init_tracing();

    let mut bundler = controller("sleep 4243 ; true")?;

    let handle = bundler.start(BuildMode::Watch).await?;
    wait_for_processes("sleep 4243", 1).await;

    drop(handle);
    assert_eq!(wait_for_exit("sleep 4243").await, 0);
    Ok(())
}

/// Poll until exactly `n` processes run `args`, returning the final count.
async fn wait_for_count(args: &str, n: usize) -> usize {
    for _ in 0..250 {
        let running = count_processes(args);
        if running == n {
            return running;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    count_processes(args)
}
