// Application Layer - Use Cases and Business Logic

pub mod jobs;
pub mod operations;
pub mod prediction;
pub mod scheduler;
pub mod sync;

// Re-exports
pub use jobs::{shutdown_channel, JobGate, ShutdownSender, ShutdownToken};
pub use operations::{Operations, StoreStats};
pub use prediction::{BatchReport, PredictionFilter, PredictionService};
pub use scheduler::{JobScheduler, ScheduleSettings};
pub use sync::{FeedSyncStats, StepOutcome, SyncReport, SyncService, SyncSettings};
