// Prediction Repository Port (Interface)

use crate::domain::{MatchId, MatchStatus, Prediction};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Prediction persistence
///
/// There is no update: predictions are written once and only ever removed in bulk.
#[async_trait]
pub trait PredictionRepository: Send + Sync {
    /// Insert a new prediction
    async fn insert(&self, prediction: &Prediction) -> Result<()>;

    /// Prediction for a match, if one was generated
    async fn find_by_match(&self, match_id: &MatchId) -> Result<Option<Prediction>>;

    /// All predictions, newest first
    async fn find_all(&self) -> Result<Vec<Prediction>>;

    /// Predictions whose match is currently in `status`, by match date ascending
    async fn find_by_match_status(&self, status: MatchStatus) -> Result<Vec<Prediction>>;

    /// Predictions for matches of a match-week
    async fn find_by_match_week(&self, match_week: i32) -> Result<Vec<Prediction>>;

    /// Delete every prediction, returns number removed
    async fn delete_all(&self) -> Result<u64>;

    async fn count(&self) -> Result<i64>;
}
