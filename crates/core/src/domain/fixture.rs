// Match Domain Model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::club::ClubId;
use super::error::{DomainError, Result};

/// Match ID (UUID v4)
pub type MatchId = String;

/// Match Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
    Postponed,
    Cancelled,
}

impl MatchStatus {
    /// Map an upstream status token (case-insensitive)
    ///
    /// Unknown tokens fall back to Scheduled.
    pub fn from_feed(token: &str) -> Self {
        match token.to_ascii_uppercase().as_str() {
            "SCHEDULED" | "TIMED" => MatchStatus::Scheduled,
            "LIVE" | "IN_PLAY" | "PAUSED" => MatchStatus::Live,
            "FINISHED" | "AWARDED" => MatchStatus::Finished,
            "POSTPONED" => MatchStatus::Postponed,
            "CANCELLED" | "SUSPENDED" => MatchStatus::Cancelled,
            _ => MatchStatus::Scheduled,
        }
    }

    /// Parse the stored representation (strict)
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "SCHEDULED" => Ok(MatchStatus::Scheduled),
            "LIVE" => Ok(MatchStatus::Live),
            "FINISHED" => Ok(MatchStatus::Finished),
            "POSTPONED" => Ok(MatchStatus::Postponed),
            "CANCELLED" => Ok(MatchStatus::Cancelled),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Scheduled => write!(f, "SCHEDULED"),
            MatchStatus::Live => write!(f, "LIVE"),
            MatchStatus::Finished => write!(f, "FINISHED"),
            MatchStatus::Postponed => write!(f, "POSTPONED"),
            MatchStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// In-match statistics (never populated by the fixtures feed)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub home_possession: Option<f64>,
    pub away_possession: Option<f64>,
    pub home_shots: Option<i32>,
    pub away_shots: Option<i32>,
    pub home_shots_on_target: Option<i32>,
    pub away_shots_on_target: Option<i32>,
    pub home_corners: Option<i32>,
    pub away_corners: Option<i32>,
    pub home_fouls: Option<i32>,
    pub away_fouls: Option<i32>,
}

/// Match Entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub home_club_id: ClubId,
    pub away_club_id: ClubId,
    pub match_date: DateTime<Utc>,

    // Null until played
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,

    pub venue: Option<String>,
    pub referee: Option<String>,
    pub attendance: Option<i32>,
    pub match_week: Option<i32>,
    pub season: Option<String>,
    pub status: MatchStatus,
    pub statistics: MatchStatistics,

    pub created_at: i64,
    pub updated_at: i64,
}

impl Match {
    /// Create a scheduled match between two distinct clubs
    pub fn new(
        id: impl Into<String>,
        home_club_id: impl Into<String>,
        away_club_id: impl Into<String>,
        match_date: DateTime<Utc>,
        now_millis: i64,
    ) -> Result<Self> {
        let home_club_id = home_club_id.into();
        let away_club_id = away_club_id.into();
        if home_club_id == away_club_id {
            return Err(DomainError::SameClubFixture(home_club_id));
        }

        Ok(Self {
            id: id.into(),
            home_club_id,
            away_club_id,
            match_date,
            home_score: None,
            away_score: None,
            venue: None,
            referee: None,
            attendance: None,
            match_week: None,
            season: None,
            status: MatchStatus::Scheduled,
            statistics: MatchStatistics::default(),
            created_at: now_millis,
            updated_at: now_millis,
        })
    }

    pub fn involves(&self, club_id: &str) -> bool {
        self.home_club_id == club_id || self.away_club_id == club_id
    }

    /// Calendar day of kick-off (UTC), the granularity fixtures are matched on
    pub fn match_day(&self) -> NaiveDate {
        self.match_date.date_naive()
    }

    /// Goals scored and conceded from `club_id`'s point of view
    ///
    /// None while either score is unknown or the club did not play.
    pub fn goals_for_against(&self, club_id: &str) -> Option<(i32, i32)> {
        let (home, away) = (self.home_score?, self.away_score?);
        if self.home_club_id == club_id {
            Some((home, away))
        } else if self.away_club_id == club_id {
            Some((away, home))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn kickoff() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 24, 14, 0, 0).unwrap()
    }

    #[test]
    fn test_status_mapping_table() {
        let cases = [
            ("SCHEDULED", MatchStatus::Scheduled),
            ("timed", MatchStatus::Scheduled),
            ("LIVE", MatchStatus::Live),
            ("In_Play", MatchStatus::Live),
            ("PAUSED", MatchStatus::Live),
            ("FINISHED", MatchStatus::Finished),
            ("AWARDED", MatchStatus::Finished),
            ("postponed", MatchStatus::Postponed),
            ("CANCELLED", MatchStatus::Cancelled),
            ("SUSPENDED", MatchStatus::Cancelled),
            ("SOMETHING_NEW", MatchStatus::Scheduled),
            ("", MatchStatus::Scheduled),
        ];
        for (token, expected) in cases {
            assert_eq!(MatchStatus::from_feed(token), expected, "token {token:?}");
        }
    }

    #[test]
    fn test_status_roundtrip_through_storage_form() {
        for status in [
            MatchStatus::Scheduled,
            MatchStatus::Live,
            MatchStatus::Finished,
            MatchStatus::Postponed,
            MatchStatus::Cancelled,
        ] {
            assert_eq!(MatchStatus::parse(&status.to_string()).unwrap(), status);
        }
        assert!(MatchStatus::parse("TIMED").is_err());
    }

    #[test]
    fn test_match_requires_distinct_clubs() {
        let err = Match::new("m1", "c1", "c1", kickoff(), 0).unwrap_err();
        assert!(err.to_string().contains("two distinct clubs"));
    }

    #[test]
    fn test_goals_from_each_side() {
        let mut m = Match::new("m1", "home", "away", kickoff(), 0).unwrap();
        assert_eq!(m.goals_for_against("home"), None);

        m.home_score = Some(3);
        m.away_score = Some(1);
        assert_eq!(m.goals_for_against("home"), Some((3, 1)));
        assert_eq!(m.goals_for_against("away"), Some((1, 3)));
        assert_eq!(m.goals_for_against("other"), None);
        assert!(m.involves("away"));
    }
}
