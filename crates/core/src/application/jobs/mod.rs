// Jobs - single-flight execution keyed by job name

pub mod constants;
mod panic_guard;
mod shutdown;

pub use panic_guard::{describe_join_error, panic_message};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::error::{AppError, Result};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Serializes invocations per job key
///
/// Find-or-create resolution is not atomic, so two overlapping syncs could both
/// create the same club. Every entry point for a job (timer or on-demand) goes
/// through the same gate; a second caller waits for the first to finish.
///
/// Each job body runs on its own task: a panic inside it is contained and
/// reported as `AppError::SyncFailed` instead of unwinding into the caller.
#[derive(Default)]
pub struct JobGate {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl JobGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, job: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(job.to_string()).or_default())
    }

    /// Run `body` once no other invocation of `job` is in flight
    ///
    /// The permit moves into the spawned task, so a caller that gives up
    /// waiting does not let a second run start while the first is still going.
    pub async fn run<T, F>(&self, job: &str, body: F) -> Result<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let permit = self.lock_for(job).lock_owned().await;
        debug!(job, "Job gate acquired");

        let handle = tokio::spawn(async move {
            let _permit = permit;
            body.await
        });

        match handle.await {
            Ok(result) => result,
            Err(join_err) => Err(AppError::SyncFailed(describe_join_error(job, join_err))),
        }
    }

    /// True while an invocation of `job` holds the gate
    pub fn is_running(&self, job: &str) -> bool {
        self.lock_for(job).try_lock().is_err()
    }
}
