// Operations - the entry points shared by scheduled and on-demand callers
//
// Every mutating operation goes through the JobGate under its job key, so a
// manual trigger overlapping a scheduled tick waits instead of racing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::application::jobs::constants::{FEED_SYNC_JOB, PREDICTIONS_JOB};
use crate::application::jobs::JobGate;
use crate::application::prediction::{BatchReport, PredictionFilter, PredictionService};
use crate::application::sync::{FeedSyncStats, SyncReport, SyncService};
use crate::domain::Prediction;
use crate::error::{AppError, Result};
use crate::port::{
    ClubRepository, MatchRepository, PlayerRepository, PredictionRepository, Repositories,
};

/// Row counts plus the last completed sync run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub clubs: i64,
    pub players: i64,
    pub matches: i64,
    pub predictions: i64,
    pub last_sync: Option<SyncReport>,
}

#[derive(Clone)]
pub struct Operations {
    sync: Arc<SyncService>,
    predictions: Arc<PredictionService>,
    repos: Repositories,
    gate: Arc<JobGate>,
    last_sync: Arc<RwLock<Option<SyncReport>>>,
}

impl Operations {
    pub fn new(sync: SyncService, predictions: PredictionService, repos: Repositories) -> Self {
        Self {
            sync: Arc::new(sync),
            predictions: Arc::new(predictions),
            repos,
            gate: Arc::new(JobGate::new()),
            last_sync: Arc::new(RwLock::new(None)),
        }
    }

    /// Full standings -> fixtures -> scorers sync
    ///
    /// Step failures are inside the report; only a panic comes back as
    /// `SyncFailed`.
    pub async fn refresh_all(&self) -> Result<SyncReport> {
        let sync = Arc::clone(&self.sync);
        let report = self
            .gate
            .run(FEED_SYNC_JOB, async move { Ok(sync.refresh_all().await) })
            .await?;

        *self.last_sync.write().await = Some(report.clone());
        Ok(report)
    }

    /// Fetch the squad of the club carrying `external_id`
    pub async fn refresh_squad(&self, external_id: i64) -> Result<FeedSyncStats> {
        let club = self
            .repos
            .clubs
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("club with external id {}", external_id)))?;

        info!(club = %club.name, external_id, "Squad refresh requested");
        let sync = Arc::clone(&self.sync);
        self.gate
            .run(FEED_SYNC_JOB, async move {
                sync.refresh_squad(external_id, &club).await
            })
            .await
    }

    /// Fetch squads for every club with an external id; returns clubs processed
    pub async fn refresh_all_squads(&self) -> Result<usize> {
        let sync = Arc::clone(&self.sync);
        self.gate
            .run(FEED_SYNC_JOB, async move { sync.refresh_all_squads().await })
            .await
    }

    pub async fn generate_predictions(&self) -> Result<BatchReport> {
        let predictions = Arc::clone(&self.predictions);
        self.gate
            .run(PREDICTIONS_JOB, async move { predictions.generate_batch().await })
            .await
    }

    /// Delete every prediction; returns how many were removed
    pub async fn clear_predictions(&self) -> Result<u64> {
        let predictions = Arc::clone(&self.predictions);
        self.gate
            .run(PREDICTIONS_JOB, async move { predictions.clear_all().await })
            .await
    }

    pub async fn regenerate_predictions(&self) -> Result<BatchReport> {
        let predictions = Arc::clone(&self.predictions);
        self.gate
            .run(PREDICTIONS_JOB, async move { predictions.regenerate().await })
            .await
    }

    pub async fn predictions(&self, filter: PredictionFilter) -> Result<Vec<Prediction>> {
        self.predictions.list(filter).await
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            clubs: self.repos.clubs.count().await?,
            players: self.repos.players.count().await?,
            matches: self.repos.matches.count().await?,
            predictions: self.repos.predictions.count().await?,
            last_sync: self.last_sync.read().await.clone(),
        })
    }

    /// True while a feed sync (full or squad) is in flight
    pub fn is_syncing(&self) -> bool {
        self.gate.is_running(FEED_SYNC_JOB)
    }
}
