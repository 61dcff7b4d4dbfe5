// Domain Layer - Pure entities and invariants

pub mod club;
pub mod error;
pub mod fixture;
pub mod player;
pub mod prediction;

// Re-exports
pub use club::{Club, ClubId};
pub use error::DomainError;
pub use fixture::{Match, MatchId, MatchStatistics, MatchStatus};
pub use player::{Player, PlayerId, PlayerPosition};
pub use prediction::{Outcome, Prediction, PredictionId};
