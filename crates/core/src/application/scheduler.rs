//! Scheduler - periodic sync and prediction jobs
//!
//! Both jobs call the same `Operations` entry points as on-demand triggers,
//! so they share its job gate. Ticks are aligned to the wall clock: the sync
//! runs at every period boundary, predictions at the boundary plus an offset
//! (hourly on the hour and at half past, by default).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::application::jobs::constants::{
    DEFAULT_PREDICTION_OFFSET, DEFAULT_SYNC_INTERVAL, FEED_SYNC_JOB, PREDICTIONS_JOB,
};
use crate::application::jobs::ShutdownToken;
use crate::application::operations::Operations;
use crate::port::TimeProvider;

/// Timer configuration for the two periodic jobs
#[derive(Debug, Clone)]
pub struct ScheduleSettings {
    pub sync_interval: Duration,
    pub prediction_offset: Duration,
    /// Run one full sync immediately instead of waiting for the first tick
    pub sync_on_start: bool,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            sync_interval: DEFAULT_SYNC_INTERVAL,
            prediction_offset: DEFAULT_PREDICTION_OFFSET,
            sync_on_start: false,
        }
    }
}

/// Time from `now_ms` until the next instant congruent to `offset_ms` modulo
/// `period_ms`; zero when `now_ms` is exactly on it
pub fn next_delay(now_ms: i64, period_ms: i64, offset_ms: i64) -> Duration {
    if period_ms <= 0 {
        return Duration::ZERO;
    }
    let into_period = (now_ms - offset_ms).rem_euclid(period_ms);
    if into_period == 0 {
        Duration::ZERO
    } else {
        Duration::from_millis((period_ms - into_period) as u64)
    }
}

/// Owns the periodic job tasks for the process lifetime
pub struct JobScheduler {
    operations: Operations,
    clock: Arc<dyn TimeProvider>,
    settings: ScheduleSettings,
}

impl JobScheduler {
    pub fn new(operations: Operations, clock: Arc<dyn TimeProvider>, settings: ScheduleSettings) -> Self {
        Self {
            operations,
            clock,
            settings,
        }
    }

    /// Spawn the sync and prediction loops; both stop once `shutdown` fires
    pub fn spawn(self, shutdown: ShutdownToken) -> Vec<JoinHandle<()>> {
        let period = self.settings.sync_interval;
        let period_ms = period.as_millis() as i64;
        let now = self.clock.now_millis();
        let sync_delay = next_delay(now, period_ms, 0);
        let prediction_delay =
            next_delay(now, period_ms, self.settings.prediction_offset.as_millis() as i64);

        info!(
            interval_secs = period.as_secs(),
            first_sync_in_secs = sync_delay.as_secs(),
            first_predictions_in_secs = prediction_delay.as_secs(),
            sync_on_start = self.settings.sync_on_start,
            "Job scheduler started"
        );

        let sync_ops = self.operations.clone();
        let sync_on_start = self.settings.sync_on_start;
        let sync_shutdown = shutdown.clone();
        let sync = tokio::spawn(async move {
            if sync_on_start {
                run_sync(&sync_ops).await;
            }
            run_periodic(FEED_SYNC_JOB, period, sync_delay, sync_shutdown, || {
                let ops = sync_ops.clone();
                async move { run_sync(&ops).await }
            })
            .await;
        });

        let prediction_ops = self.operations;
        let predictions = tokio::spawn(run_periodic(
            PREDICTIONS_JOB,
            period,
            prediction_delay,
            shutdown,
            move || {
                let ops = prediction_ops.clone();
                async move { run_predictions(&ops).await }
            },
        ));

        vec![sync, predictions]
    }
}

async fn run_sync(operations: &Operations) {
    match operations.refresh_all().await {
        Ok(report) if report.failed_steps().is_empty() => {}
        Ok(report) => warn!(failed_steps = ?report.failed_steps(), "Scheduled sync had failed steps"),
        Err(e) => error!(error = %e, "Scheduled sync failed"),
    }
}

async fn run_predictions(operations: &Operations) {
    if let Err(e) = operations.generate_predictions().await {
        error!(error = %e, "Scheduled prediction batch failed");
    }
}

/// Call `job` every `period`, first after `first_delay`, until shutdown
///
/// Ticks missed while a run is still going are skipped rather than bunched.
/// Shutdown is observed between runs; an in-flight run completes.
pub async fn run_periodic<F, Fut>(
    job: &'static str,
    period: Duration,
    first_delay: Duration,
    mut shutdown: ShutdownToken,
    mut body: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut ticker = interval_at(Instant::now() + first_delay, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                info!(job, "Scheduled run starting");
                body().await;
            }
            _ = shutdown.wait() => break,
        }
        if shutdown.is_shutdown() {
            break;
        }
    }
    info!(job, "Scheduled job stopped");
}
