// Sync run reporting

use serde::{Deserialize, Serialize};

/// What happened to one feed record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Created,
    Updated,
    /// Resolution gap: no local entity and creation not permitted
    Skipped,
}

/// Per-feed record counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSyncStats {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub malformed: usize,
    pub failed: usize,
}

impl FeedSyncStats {
    pub fn record(&mut self, applied: Applied) {
        match applied {
            Applied::Created => self.created += 1,
            Applied::Updated => self.updated += 1,
            Applied::Skipped => self.skipped += 1,
        }
    }

    /// Records that reached the store
    pub fn touched(&self) -> usize {
        self.created + self.updated
    }
}

/// Result of one sync step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StepOutcome {
    Completed(FeedSyncStats),
    Failed(String),
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

/// Result of a full standings -> fixtures -> scorers run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub standings: StepOutcome,
    pub fixtures: StepOutcome,
    pub scorers: StepOutcome,
    pub started_at: i64,
    pub finished_at: i64,
}

impl SyncReport {
    /// Names of the steps that failed, in run order
    pub fn failed_steps(&self) -> Vec<&'static str> {
        [
            ("standings", &self.standings),
            ("fixtures", &self.fixtures),
            ("scorers", &self.scorers),
        ]
        .into_iter()
        .filter(|(_, outcome)| outcome.is_failed())
        .map(|(name, _)| name)
        .collect()
    }
}
