// Job constants (no magic values)
use std::time::Duration;

/// Job key serializing every feed sync entry point
pub const FEED_SYNC_JOB: &str = "feed-sync";

/// Job key serializing prediction generation, clearing and regeneration
pub const PREDICTIONS_JOB: &str = "predictions";

/// Default full sync period (hourly, on the hour)
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Default prediction batch offset within the sync period (half past)
pub const DEFAULT_PREDICTION_OFFSET: Duration = Duration::from_secs(30 * 60);

/// Pause between per-club squad fetches (upstream rate limit)
pub const DEFAULT_SQUAD_DELAY: Duration = Duration::from_millis(200);

/// Soonest unpredicted scheduled matches handled per batch
pub const PREDICTION_BATCH_SIZE: usize = 10;

/// Upcoming predictions returned by the listing query
pub const UPCOMING_PREDICTIONS_LIMIT: usize = 10;
