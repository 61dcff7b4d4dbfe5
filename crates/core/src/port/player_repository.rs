// Player Repository Port (Interface)

use crate::domain::{ClubId, Player, PlayerId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Player persistence
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Insert a new player
    async fn insert(&self, player: &Player) -> Result<()>;

    /// Update player (full row overwrite)
    async fn update(&self, player: &Player) -> Result<()>;

    /// Find player by ID
    async fn find_by_id(&self, id: &PlayerId) -> Result<Option<Player>>;

    /// All players, insertion order
    async fn find_all(&self) -> Result<Vec<Player>>;

    /// Players attached to a club
    async fn find_by_club(&self, club_id: &ClubId) -> Result<Vec<Player>>;

    async fn count(&self) -> Result<i64>;
}
