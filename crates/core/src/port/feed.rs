// Football Feed Port (Interface)
//
// Typed payloads for the four upstream endpoints. Documents are decoded once at
// the adapter boundary; everything downstream works on these structs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Feed access errors
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Feed transport error: {0}")]
    Transport(String),

    #[error("Feed request timed out after {0}s")]
    Timeout(u64),

    #[error("Feed returned HTTP {code} for {url}")]
    Status { code: u16, url: String },

    #[error("Feed document could not be decoded: {0}")]
    Decode(String),
}

/// One element of a feed array
///
/// A record that does not fit the expected shape is kept as `Malformed` so
/// its siblings still decode.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedRecord<T> {
    Valid(T),
    Malformed(String),
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for FeedRecord<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match serde_json::from_value::<T>(value) {
            Ok(record) => FeedRecord::Valid(record),
            Err(e) => FeedRecord::Malformed(e.to_string()),
        })
    }
}

// ============================================================================
// GET /competitions/{code}/standings
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct StandingsPayload {
    #[serde(default)]
    pub standings: Vec<StandingGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandingGroup {
    #[serde(rename = "type")]
    pub kind: String, // TOTAL | HOME | AWAY
    #[serde(default)]
    pub table: Vec<FeedRecord<TableEntry>>,
}

impl StandingGroup {
    pub fn is_total(&self) -> bool {
        self.kind == "TOTAL"
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEntry {
    pub position: i32,
    pub team: FeedTeam,
    pub played_games: i32,
    pub won: i32,
    pub draw: i32,
    pub lost: i32,
    pub points: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedTeam {
    pub id: i64,
    pub name: String,
    pub short_name: Option<String>,
    pub tla: Option<String>,
    pub crest: Option<String>,
}

// ============================================================================
// GET /competitions/{code}/matches?season={year}
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct MatchesPayload {
    #[serde(default)]
    pub matches: Vec<FeedRecord<FixtureEntry>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureEntry {
    pub id: i64,
    pub utc_date: DateTime<Utc>,
    pub status: String,
    pub matchday: Option<i32>,
    pub venue: Option<String>,
    pub home_team: FixtureSide,
    pub away_team: FixtureSide,
    #[serde(default)]
    pub score: FixtureScore,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FixtureSide {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureScore {
    #[serde(default)]
    pub full_time: FullTimeScore,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FullTimeScore {
    pub home: Option<i32>,
    pub away: Option<i32>,
}

// ============================================================================
// GET /competitions/{code}/scorers
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ScorersPayload {
    #[serde(default)]
    pub scorers: Vec<FeedRecord<ScorerEntry>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorerEntry {
    pub player: ScorerPlayer,
    pub team: TeamRef,
    pub goals: Option<i32>,
    pub assists: Option<i32>,
    pub played_matches: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorerPlayer {
    pub id: i64,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>, // parsed best-effort downstream
    pub nationality: Option<String>,
    pub section: Option<String>,
    pub shirt_number: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TeamRef {
    pub id: i64,
}

// ============================================================================
// GET /teams/{id}
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TeamPayload {
    #[serde(default)]
    pub squad: Vec<FeedRecord<SquadMember>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadMember {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub position: Option<String>,
    pub date_of_birth: Option<String>,
    pub nationality: Option<String>,
    pub shirt_number: Option<i32>,
}

/// Read-only access to the third-party football data service
#[async_trait]
pub trait FootballFeed: Send + Sync {
    /// League table groups for the configured competition
    async fn standings(&self) -> Result<StandingsPayload, FeedError>;

    /// Fixtures of the season starting in `season`
    async fn matches(&self, season: i32) -> Result<MatchesPayload, FeedError>;

    /// Top scorers of the configured competition
    async fn scorers(&self) -> Result<ScorersPayload, FeedError>;

    /// Team document including its squad
    async fn team(&self, external_id: i64) -> Result<TeamPayload, FeedError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_malformed_record_does_not_poison_siblings() {
        let payload: ScorersPayload = serde_json::from_value(json!({
            "scorers": [
                { "player": { "id": 1, "name": "Erling Haaland" }, "team": { "id": 65 }, "goals": 20 },
                { "player": { "name": "No Id" }, "team": { "id": 65 } },
                { "player": { "id": 3, "name": "Mohamed Salah", "section": "Right Winger" },
                  "team": { "id": 64 }, "goals": 18, "assists": null }
            ]
        }))
        .unwrap();

        assert_eq!(payload.scorers.len(), 3);
        assert!(matches!(&payload.scorers[0], FeedRecord::Valid(s) if s.goals == Some(20)));
        assert!(matches!(&payload.scorers[1], FeedRecord::Malformed(reason) if reason.contains("id")));
        assert!(matches!(&payload.scorers[2], FeedRecord::Valid(s) if s.assists.is_none()));
    }

    #[test]
    fn test_fixture_entry_decodes_optional_fields() {
        let payload: MatchesPayload = serde_json::from_value(json!({
            "matches": [{
                "id": 537785,
                "utcDate": "2026-10-24T14:00:00Z",
                "status": "TIMED",
                "matchday": 9,
                "homeTeam": { "id": 57, "name": "Arsenal FC" },
                "awayTeam": { "id": 61, "name": "Chelsea FC" },
                "score": { "fullTime": { "home": null, "away": null } }
            }]
        }))
        .unwrap();

        let FeedRecord::Valid(entry) = &payload.matches[0] else {
            panic!("expected a valid fixture");
        };
        assert_eq!(entry.matchday, Some(9));
        assert_eq!(entry.venue, None);
        assert_eq!(entry.score.full_time, FullTimeScore::default());
        assert_eq!(entry.home_team.name, "Arsenal FC");
    }

    #[test]
    fn test_standing_group_kind() {
        let payload: StandingsPayload = serde_json::from_value(json!({
            "standings": [
                { "type": "TOTAL", "table": [] },
                { "type": "HOME", "table": [] }
            ]
        }))
        .unwrap();
        let totals: Vec<_> = payload.standings.iter().filter(|g| g.is_total()).collect();
        assert_eq!(totals.len(), 1);
    }
}
