// Player Domain Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::club::ClubId;

/// Player ID (UUID v4)
pub type PlayerId = String;

/// Canonical playing positions
///
/// `Player::position` is stored as free text because the squad feed writes the
/// upstream value verbatim and the scorers feed passes unknown sections through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPosition {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    Unknown,
}

impl PlayerPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerPosition::Goalkeeper => "Goalkeeper",
            PlayerPosition::Defender => "Defender",
            PlayerPosition::Midfielder => "Midfielder",
            PlayerPosition::Forward => "Forward",
            PlayerPosition::Unknown => "Unknown",
        }
    }

    /// Classify a free-text scorers "section" by substring (case-insensitive)
    ///
    /// Returns None when no rule matches so the caller can keep the raw text.
    pub fn from_section(section: &str) -> Option<Self> {
        let lower = section.to_lowercase();
        if lower.contains("goalkeeper") {
            Some(PlayerPosition::Goalkeeper)
        } else if lower.contains("defence") || lower.contains("defender") {
            Some(PlayerPosition::Defender)
        } else if lower.contains("midfield") {
            Some(PlayerPosition::Midfielder)
        } else if ["forward", "winger", "striker", "offence"]
            .iter()
            .any(|k| lower.contains(k))
        {
            Some(PlayerPosition::Forward)
        } else {
            None
        }
    }
}

impl std::fmt::Display for PlayerPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Player Entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub club_id: Option<ClubId>, // weak reference, nullable

    // Profile
    pub jersey_number: Option<i32>,
    pub position: String,
    pub nationality: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub market_value: Option<f64>,
    pub photo_url: Option<String>,

    // Cumulative season statistics
    pub goals: i32,
    pub assists: i32,
    pub yellow_cards: i32,
    pub red_cards: i32,
    pub matches_played: i32,
    pub minutes_played: i32,
    pub clean_sheets: i32, // goalkeepers only, zero otherwise
    pub saves: i32,        // goalkeepers only, zero otherwise

    pub created_at: i64,
    pub updated_at: i64,
}

impl Player {
    /// Create a player with zero-initialized statistics
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        club_id: Option<ClubId>,
        now_millis: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            club_id,
            jersey_number: None,
            position: PlayerPosition::Unknown.as_str().to_string(),
            nationality: None,
            date_of_birth: None,
            height: None,
            weight: None,
            market_value: None,
            photo_url: None,
            goals: 0,
            assists: 0,
            yellow_cards: 0,
            red_cards: 0,
            matches_played: 0,
            minutes_played: 0,
            clean_sheets: 0,
            saves: 0,
            created_at: now_millis,
            updated_at: now_millis,
        }
    }

    pub fn belongs_to(&self, club_id: &str) -> bool {
        self.club_id.as_deref() == Some(club_id)
    }
}
