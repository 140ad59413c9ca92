pub mod builders;
pub mod fake_builder;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

/// Upper bound for any single awaited step in a test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Route themewatch logs into the test harness's captured output.
///
/// Verbosity follows `THEMEWATCH_LOG`, like the binary, and defaults to
/// `debug` for the crate under test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env(themewatch::logging::LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new("themewatch=debug"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Await `f`, failing the test after [`TEST_TIMEOUT`].
pub async fn with_timeout<F: Future>(f: F) -> F::Output {
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(out) => out,
        Err(_) => panic!("test step timed out after {TEST_TIMEOUT:?}"),
    }
}

/// Number of live processes whose full command line is exactly `args`.
///
/// Zombies show up as `[name] <defunct>` and are not counted.
#[cfg(unix)]
pub fn count_processes(args: &str) -> usize {
    let out = match std::process::Command::new("ps").args(["-eo", "args"]).output() {
        Ok(out) => out,
        Err(err) => panic!("failed to run ps: {err}"),
    };
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .filter(|line| line.trim() == args)
        .count()
}

/// Poll until no process runs `args`, returning how many are left at the
/// deadline.
#[cfg(unix)]
pub async fn wait_for_exit(args: &str) -> usize {
    let deadline = tokio::time::Instant::now() + TEST_TIMEOUT;
    loop {
        let left = count_processes(args);
        if left == 0 || tokio::time::Instant::now() >= deadline {
            return left;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Poll until at least `n` processes run `args`.
#[cfg(unix)]
pub async fn wait_for_processes(args: &str, n: usize) {
    with_timeout(async {
        while count_processes(args) < n {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
}
