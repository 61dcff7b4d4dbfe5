//! RPC Request/Response Types
//!
//! Parameters and results of the JSON-RPC methods. Every response carries a
//! `message` summarizing the outcome for display.

use matchday_core::application::{BatchReport, FeedSyncStats, PredictionFilter, SyncReport};
use matchday_core::domain::Prediction;
use matchday_core::error::AppError;
use serde::{Deserialize, Serialize};

/// data.refresh.v1 - Full standings -> fixtures -> scorers sync
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub message: String,
    pub failed_steps: Vec<String>,
    pub report: SyncReport,
}

/// data.squad.v1 - Fetch one club's squad
#[derive(Debug, Deserialize)]
pub struct SquadRequest {
    pub external_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadResponse {
    pub message: String,
    pub external_id: i64,
    pub stats: FeedSyncStats,
}

/// data.squads.v1 - Fetch every club's squad
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadsResponse {
    pub message: String,
    pub clubs_processed: usize,
}

/// predictions.generate.v1 / predictions.regenerate.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub message: String,
    pub report: BatchReport,
}

/// predictions.clear.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResponse {
    pub message: String,
    pub removed: u64,
}

/// predictions.list.v1 - `scope` is `all` (default), `upcoming` or `week`
#[derive(Debug, Default, Deserialize)]
pub struct ListPredictionsRequest {
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub week: Option<i32>,
}

impl ListPredictionsRequest {
    pub fn filter(&self) -> Result<PredictionFilter, AppError> {
        match (self.scope.as_deref().unwrap_or("all"), self.week) {
            ("all", _) => Ok(PredictionFilter::All),
            ("upcoming", _) => Ok(PredictionFilter::Upcoming),
            ("week", Some(week)) if week > 0 => Ok(PredictionFilter::Week(week)),
            ("week", _) => Err(AppError::Validation(
                "scope 'week' needs a positive 'week' number".to_string(),
            )),
            (other, _) => Err(AppError::Validation(format!(
                "unknown scope '{}', expected all, upcoming or week",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPredictionsResponse {
    pub predictions: Vec<Prediction>,
}

/// admin.stats.v1 - Store counts and last sync
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub clubs: i64,
    pub players: i64,
    pub matches: i64,
    pub predictions: i64,
    pub syncing: bool,
    pub last_sync: Option<SyncReport>,
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(scope: Option<&str>, week: Option<i32>) -> ListPredictionsRequest {
        ListPredictionsRequest {
            scope: scope.map(str::to_string),
            week,
        }
    }

    #[test]
    fn test_list_scope_parsing() {
        assert_eq!(request(None, None).filter().unwrap(), PredictionFilter::All);
        assert_eq!(request(Some("upcoming"), None).filter().unwrap(), PredictionFilter::Upcoming);
        assert_eq!(request(Some("week"), Some(9)).filter().unwrap(), PredictionFilter::Week(9));
        assert!(matches!(request(Some("week"), None).filter(), Err(AppError::Validation(_))));
        assert!(matches!(request(Some("season"), None).filter(), Err(AppError::Validation(_))));
    }
}
