// Club Repository Port (Interface)

use crate::domain::{Club, ClubId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Club persistence
#[async_trait]
pub trait ClubRepository: Send + Sync {
    /// Insert a new club
    async fn insert(&self, club: &Club) -> Result<()>;

    /// Update club (full row overwrite)
    async fn update(&self, club: &Club) -> Result<()>;

    /// Find club by ID
    async fn find_by_id(&self, id: &ClubId) -> Result<Option<Club>>;

    /// Find club by exact, case-sensitive name
    async fn find_by_name(&self, name: &str) -> Result<Option<Club>>;

    /// Find club by the feed's team id
    async fn find_by_external_id(&self, external_id: i64) -> Result<Option<Club>>;

    /// All clubs in table order (unranked clubs last, then by name)
    async fn find_all(&self) -> Result<Vec<Club>>;

    async fn count(&self) -> Result<i64>;

    /// Delete club; its players go with it
    async fn delete(&self, id: &ClubId) -> Result<bool>;
}
