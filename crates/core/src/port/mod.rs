// Port Layer - Interfaces for external dependencies

pub mod club_repository;
pub mod feed;
pub mod id_provider; // For deterministic testing
pub mod match_repository;
pub mod mocks;
pub mod player_repository;
pub mod prediction_repository;
pub mod time_provider;

// Re-exports
pub use club_repository::ClubRepository;
pub use feed::{
    FeedError, FeedRecord, FixtureEntry, FootballFeed, MatchesPayload, ScorerEntry,
    ScorersPayload, SquadMember, StandingGroup, StandingsPayload, TableEntry, TeamPayload,
};
pub use id_provider::IdProvider;
pub use match_repository::MatchRepository;
pub use player_repository::PlayerRepository;
pub use prediction_repository::PredictionRepository;
pub use time_provider::TimeProvider;

use std::sync::Arc;

/// The four repositories, as handed to application services
#[derive(Clone)]
pub struct Repositories {
    pub clubs: Arc<dyn ClubRepository>,
    pub players: Arc<dyn PlayerRepository>,
    pub matches: Arc<dyn MatchRepository>,
    pub predictions: Arc<dyn PredictionRepository>,
}
