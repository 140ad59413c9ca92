use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use themewatch::errors::Result;
use themewatch::exec::BuildController;
use themewatch::types::BuildMode;

/// One call made against [`FakeBuildController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildCall {
    Start(BuildMode),
    Restart { previous: u64, mode: BuildMode },
}

/// A build controller that spawns nothing.
///
/// Handles are generation numbers: `start` returns 1 and each `restart`
/// returns the next one, so tests can check that restarts release the handle
/// they were given.
#[derive(Debug, Clone, Default)]
pub struct FakeBuildController {
    calls: Arc<Mutex<Vec<BuildCall>>>,
    generation: u64,
}

impl FakeBuildController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<BuildCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn restart_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, BuildCall::Restart { .. }))
            .count()
    }
}

impl BuildController for FakeBuildController {
    type Handle = u64;

    fn start(
        &mut self,
        mode: BuildMode,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Handle>> + Send + '_>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(BuildCall::Start(mode));
            self.generation += 1;
            Ok(self.generation)
        })
    }

    fn restart(
        &mut self,
        previous: Self::Handle,
        mode: BuildMode,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Handle>> + Send + '_>> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push(BuildCall::Restart { previous, mode });
            self.generation += 1;
            Ok(self.generation)
        })
    }
}
