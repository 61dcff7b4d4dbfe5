// Match Repository Port (Interface)

use crate::domain::{ClubId, Match, MatchId, MatchStatus};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Match persistence
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Insert a new match
    async fn insert(&self, fixture: &Match) -> Result<()>;

    /// Update match (full row overwrite)
    async fn update(&self, fixture: &Match) -> Result<()>;

    /// Find match by ID
    async fn find_by_id(&self, id: &MatchId) -> Result<Option<Match>>;

    /// Matches where the club plays home or away
    async fn find_by_club(&self, club_id: &ClubId) -> Result<Vec<Match>>;

    /// Matches in a status, soonest first
    async fn find_by_status(&self, status: MatchStatus) -> Result<Vec<Match>>;

    async fn count(&self) -> Result<i64>;

    /// Delete match; its prediction goes with it
    async fn delete(&self, id: &MatchId) -> Result<bool>;
}
