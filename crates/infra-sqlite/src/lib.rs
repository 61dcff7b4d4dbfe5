// Matchday Infrastructure - SQLite Adapter
// Implements: ClubRepository, PlayerRepository, MatchRepository, PredictionRepository

mod club_repository;
mod connection;
mod error;
mod match_repository;
mod migration;
mod player_repository;
mod prediction_repository;

pub use club_repository::SqliteClubRepository;
pub use connection::{create_pool, database_url};
pub use match_repository::SqliteMatchRepository;
pub use migration::{run_migrations, schema_version};
pub use player_repository::SqlitePlayerRepository;
pub use prediction_repository::SqlitePredictionRepository;

use matchday_core::port::Repositories;
use sqlx::SqlitePool;
use std::sync::Arc;

/// All four SQLite repositories over one pool
pub fn repositories(pool: SqlitePool) -> Repositories {
    Repositories {
        clubs: Arc::new(SqliteClubRepository::new(pool.clone())),
        players: Arc::new(SqlitePlayerRepository::new(pool.clone())),
        matches: Arc::new(SqliteMatchRepository::new(pool.clone())),
        predictions: Arc::new(SqlitePredictionRepository::new(pool)),
    }
}
