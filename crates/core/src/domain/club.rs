// Club Domain Model

use serde::{Deserialize, Serialize};

/// Club ID (UUID v4, injected by IdProvider)
pub type ClubId = String;

/// Club Entity
///
/// Standings columns are owned by the standings feed and overwritten on every
/// sync. Descriptive columns (stadium, manager, founded year) are only ever
/// written locally and survive syncs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    // Identity
    pub id: ClubId,
    pub name: String, // unique display name, resolution key for two feeds
    pub external_id: Option<i64>,

    // Feed-provided descriptors
    pub short_name: Option<String>,
    pub tla: Option<String>,
    pub crest_url: Option<String>,
    pub logo_url: Option<String>,

    // Locally maintained descriptors
    pub stadium: Option<String>,
    pub manager: Option<String>,
    pub founded_year: Option<i32>,

    // League table
    pub position: Option<i32>,
    pub played_games: Option<i32>,
    pub won: Option<i32>,
    pub draw: Option<i32>,
    pub lost: Option<i32>,
    pub points: Option<i32>,
    pub goals_for: Option<i32>,
    pub goals_against: Option<i32>,
    pub goal_difference: Option<i32>,

    pub created_at: i64, // epoch ms
    pub updated_at: i64,
}

impl Club {
    /// Create a club with an empty table row
    ///
    /// # Arguments
    ///
    /// * `id` - Unique club ID (injected, not generated)
    /// * `name` - Display name, used as the resolution key
    /// * `now_millis` - Creation timestamp in epoch ms (injected, not system time)
    pub fn new(id: impl Into<String>, name: impl Into<String>, now_millis: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            external_id: None,
            short_name: None,
            tla: None,
            crest_url: None,
            logo_url: None,
            stadium: None,
            manager: None,
            founded_year: None,
            position: None,
            played_games: None,
            won: None,
            draw: None,
            lost: None,
            points: None,
            goals_for: None,
            goals_against: None,
            goal_difference: None,
            created_at: now_millis,
            updated_at: now_millis,
        }
    }

    /// Short name when known, full name otherwise
    pub fn display_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }

    /// `goal_difference == goals_for - goals_against` whenever all three are known
    pub fn goal_difference_consistent(&self) -> bool {
        match (self.goals_for, self.goals_against, self.goal_difference) {
            (Some(gf), Some(ga), Some(gd)) => gf - ga == gd,
            _ => true,
        }
    }

    /// `points == won * 3 + draw` whenever all three are known
    ///
    /// Documented invariant only; the feed is trusted and syncs never reject rows
    /// that break it (points deductions exist).
    pub fn points_consistent(&self) -> bool {
        match (self.won, self.draw, self.points) {
            (Some(w), Some(d), Some(p)) => w * 3 + d == p,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_name() {
        let mut club = Club::new("c1", "Arsenal FC", 0);
        assert_eq!(club.display_name(), "Arsenal FC");

        club.short_name = Some("Arsenal".to_string());
        assert_eq!(club.display_name(), "Arsenal");
    }

    #[test]
    fn test_table_invariants() {
        let mut club = Club::new("c1", "Everton FC", 0);
        assert!(club.goal_difference_consistent());
        assert!(club.points_consistent());

        club.goals_for = Some(20);
        club.goals_against = Some(12);
        club.goal_difference = Some(8);
        club.won = Some(5);
        club.draw = Some(3);
        club.points = Some(18);
        assert!(club.goal_difference_consistent());
        assert!(club.points_consistent());

        club.goal_difference = Some(7);
        club.points = Some(10);
        assert!(!club.goal_difference_consistent());
        assert!(!club.points_consistent());
    }
}
