//! Heuristic match model
//!
//! An explicit, auditable formula: a home-advantage prior shifted by recent
//! form, league position and table points, normalized and clamped. Pure
//! functions only; loading the inputs is the service's job.

use crate::domain::{Match, MatchStatus, Outcome};

/// Finished matches counted towards form
pub const FORM_WINDOW: usize = 5;

/// Best possible form (five wins)
pub const MAX_FORM_POINTS: i32 = 15;

/// Position assumed for a club without one (bottom of the table)
pub const DEFAULT_POSITION: i32 = 20;

// Prior, in percentage points
const BASE_HOME: f64 = 40.0;
const BASE_DRAW: f64 = 30.0;
const BASE_AWAY: f64 = 30.0;

// Swing weights
const FORM_SCALE: f64 = 15.0;
const FORM_WEIGHT: f64 = 10.0;
const POSITION_SCALE: f64 = 20.0;
const POSITION_WEIGHT: f64 = 15.0;
const POINTS_SCALE: f64 = 40.0;
const POINTS_WEIGHT: f64 = 10.0;

// Top-4 vs bottom-4
const TOP_POSITION_MAX: i32 = 4;
const BOTTOM_POSITION_MIN: i32 = 17;
const MISMATCH_FAVORITE_BONUS: f64 = 10.0;
const MISMATCH_UNDERDOG_PENALTY: f64 = 5.0;

/// Bounds for the home and away probabilities
pub const MIN_SIDE_PROBABILITY: f64 = 5.0;
pub const MAX_SIDE_PROBABILITY: f64 = 85.0;

// Score inference
const DOMINANT_PROBABILITY: f64 = 60.0;
const STRONG_FORM: i32 = 10;
const CLEAN_SHEET_FORM: i32 = 12;
const LOW_SCORING_FORM: i32 = 5;

/// Inputs for one side of a fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideSnapshot {
    pub form_points: i32,
    pub position: i32,
    pub points: i32,
}

impl SideSnapshot {
    /// Snapshot with the model defaults for missing position and points
    pub fn new(form_points: i32, position: Option<i32>, points: Option<i32>) -> Self {
        Self {
            form_points,
            position: position.unwrap_or(DEFAULT_POSITION),
            points: points.unwrap_or(0),
        }
    }
}

/// Home / draw / away probabilities in percentage points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probabilities {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl Probabilities {
    /// The largest of the three
    pub fn confidence(&self) -> f64 {
        self.home.max(self.draw).max(self.away)
    }

    /// Home vs away comparison; exact ties are a draw
    pub fn outcome(&self) -> Outcome {
        if self.home > self.away {
            Outcome::HomeWin
        } else if self.away > self.home {
            Outcome::AwayWin
        } else {
            Outcome::Draw
        }
    }

    pub fn total(&self) -> f64 {
        self.home + self.draw + self.away
    }
}

/// Last `FORM_WINDOW` finished matches of a club, most recent first
pub fn recent_finished(mut matches: Vec<Match>) -> Vec<Match> {
    matches.retain(|m| m.status == MatchStatus::Finished);
    matches.sort_by(|a, b| b.match_date.cmp(&a.match_date));
    matches.truncate(FORM_WINDOW);
    matches
}

/// 3 per win, 1 per draw, from `club_id`'s side; unscored matches count nothing
pub fn form_points(club_id: &str, recent: &[Match]) -> i32 {
    recent
        .iter()
        .filter_map(|m| m.goals_for_against(club_id))
        .map(|(scored, conceded)| match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => 3,
            std::cmp::Ordering::Equal => 1,
            std::cmp::Ordering::Less => 0,
        })
        .sum()
}

/// Shift the prior by form, position, points and the mismatch bonus, then
/// normalize to 100 and clamp
///
/// Draw is the residual after clamping home and away, so the three always
/// sum to 100.
pub fn win_probabilities(home: &SideSnapshot, away: &SideSnapshot) -> Probabilities {
    let mut h = BASE_HOME;
    let mut a = BASE_AWAY;

    let form_shift = f64::from(home.form_points - away.form_points) / FORM_SCALE * FORM_WEIGHT;
    h += form_shift;
    a -= form_shift;

    // Lower position number is better
    let position_shift = f64::from(away.position - home.position) / POSITION_SCALE * POSITION_WEIGHT;
    h += position_shift;
    a -= position_shift;

    let points_shift = f64::from(home.points - away.points) / POINTS_SCALE * POINTS_WEIGHT;
    h += points_shift;
    a -= points_shift;

    if home.position <= TOP_POSITION_MAX && away.position >= BOTTOM_POSITION_MIN {
        h += MISMATCH_FAVORITE_BONUS;
        a -= MISMATCH_UNDERDOG_PENALTY;
    } else if away.position <= TOP_POSITION_MAX && home.position >= BOTTOM_POSITION_MIN {
        a += MISMATCH_FAVORITE_BONUS;
        h -= MISMATCH_UNDERDOG_PENALTY;
    }

    // Draw only enters through the normalizing total
    let total = h + BASE_DRAW + a;
    h = h / total * 100.0;
    a = a / total * 100.0;

    let home_p = h.clamp(MIN_SIDE_PROBABILITY, MAX_SIDE_PROBABILITY);
    let away_p = a.clamp(MIN_SIDE_PROBABILITY, MAX_SIDE_PROBABILITY);
    let draw_p = (100.0 - home_p - away_p).max(MIN_SIDE_PROBABILITY);

    Probabilities {
        home: home_p,
        draw: draw_p,
        away: away_p,
    }
}

/// Score line consistent with `probabilities.outcome()`
///
/// Favorite wins 2-1, or 3-1 / 3-0 when dominant and in strong / excellent
/// form. Draws are 0-0 when both sides are out of form, otherwise 1-1.
pub fn predict_score(probabilities: &Probabilities, home_form: i32, away_form: i32) -> (i32, i32) {
    fn favorite_line(probability: f64, form: i32) -> (i32, i32) {
        if probability > DOMINANT_PROBABILITY {
            let scored = 2 + i32::from(form > STRONG_FORM);
            let conceded = if form > CLEAN_SHEET_FORM { 0 } else { 1 };
            (scored, conceded)
        } else {
            (2, 1)
        }
    }

    match probabilities.outcome() {
        Outcome::HomeWin => favorite_line(probabilities.home, home_form),
        Outcome::AwayWin => {
            let (away, home) = favorite_line(probabilities.away, away_form);
            (home, away)
        }
        Outcome::Draw => {
            if home_form < LOW_SCORING_FORM && away_form < LOW_SCORING_FORM {
                (0, 0)
            } else {
                (1, 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn finished(id: usize, home: &str, away: &str, score: (i32, i32), days_ago: i64) -> Match {
        let date = Utc.with_ymd_and_hms(2026, 10, 19, 15, 0, 0).unwrap() - Duration::days(days_ago);
        let mut m = Match::new(format!("m{id}"), home, away, date, 0).unwrap();
        m.status = MatchStatus::Finished;
        m.home_score = Some(score.0);
        m.away_score = Some(score.1);
        m
    }

    #[test]
    fn test_form_points_extremes_and_mix() {
        let wins: Vec<Match> = (0..5).map(|i| finished(i, "c", "x", (2, 0), i as i64)).collect();
        assert_eq!(form_points("c", &wins), 15);

        let losses: Vec<Match> = (0..5).map(|i| finished(i, "x", "c", (3, 1), i as i64)).collect();
        assert_eq!(form_points("c", &losses), 0);

        let mixed = vec![
            finished(0, "c", "x", (1, 0), 1),
            finished(1, "x", "c", (2, 0), 2),
            finished(2, "y", "c", (0, 4), 3),
            finished(3, "c", "y", (0, 1), 4),
            finished(4, "c", "z", (3, 2), 5),
        ];
        assert_eq!(form_points("c", &mixed), 9);
    }

    #[test]
    fn test_recent_finished_window() {
        let mut all: Vec<Match> = (0..8).map(|i| finished(i, "c", "x", (1, 1), i as i64)).collect();
        let mut upcoming = finished(99, "c", "x", (0, 0), -3);
        upcoming.status = MatchStatus::Scheduled;
        all.push(upcoming);

        let recent = recent_finished(all);
        assert_eq!(recent.len(), FORM_WINDOW);
        assert_eq!(recent[0].id, "m0");
        assert!(recent.windows(2).all(|w| w[0].match_date >= w[1].match_date));

        // Unscored finished match counts nothing
        let mut unscored = finished(1, "c", "x", (0, 0), 1);
        unscored.home_score = None;
        assert_eq!(form_points("c", &[unscored]), 0);
    }

    #[test]
    fn test_probabilities_sum_and_bounds_over_input_space() {
        for home_form in (0..=MAX_FORM_POINTS).step_by(3) {
            for away_form in (0..=MAX_FORM_POINTS).step_by(5) {
                for home_pos in 1..=20 {
                    for away_pos in [1, 4, 10, 17, 20] {
                        for (home_pts, away_pts) in [(0, 0), (90, 5), (5, 90), (45, 44)] {
                            let p = win_probabilities(
                                &SideSnapshot { form_points: home_form, position: home_pos, points: home_pts },
                                &SideSnapshot { form_points: away_form, position: away_pos, points: away_pts },
                            );
                            assert!((p.total() - 100.0).abs() <= 0.01, "sum {:?}", p);
                            assert!((5.0..=85.0).contains(&p.home), "home {:?}", p);
                            assert!((5.0..=85.0).contains(&p.away), "away {:?}", p);
                            assert!(p.draw >= 5.0);
                            assert_eq!(p.confidence(), p.home.max(p.draw).max(p.away));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_top_vs_bottom_favors_home() {
        let home = SideSnapshot::new(0, Some(1), Some(0));
        let away = SideSnapshot::new(0, Some(20), Some(0));
        let p = win_probabilities(&home, &away);

        assert!(p.home > p.away);
        assert_eq!(p.outcome(), Outcome::HomeWin);
        // 64.25 / 105 * 100
        assert!((p.home - 61.190).abs() < 0.01);
        assert_eq!(predict_score(&p, 0, 0), (2, 1));
    }

    #[test]
    fn test_identical_sides_keep_home_advantage() {
        let side = SideSnapshot::new(9, Some(8), Some(14));
        let p = win_probabilities(&side, &side);
        assert!((p.home - 40.0).abs() < 1e-9);
        assert!((p.draw - 30.0).abs() < 1e-9);
        assert!((p.away - 30.0).abs() < 1e-9);
        assert_eq!(p.outcome(), Outcome::HomeWin);
        assert_eq!(predict_score(&p, 9, 9), (2, 1));
    }

    #[test]
    fn test_score_lines() {
        let even = Probabilities { home: 35.0, draw: 30.0, away: 35.0 };
        assert_eq!(even.outcome(), Outcome::Draw);
        assert_eq!(predict_score(&even, 4, 2), (0, 0));
        assert_eq!(predict_score(&even, 4, 9), (1, 1));

        let dominant_home = Probabilities { home: 70.0, draw: 20.0, away: 10.0 };
        assert_eq!(predict_score(&dominant_home, 10, 0), (2, 1));
        assert_eq!(predict_score(&dominant_home, 12, 0), (3, 1));
        assert_eq!(predict_score(&dominant_home, 13, 0), (3, 0));

        let dominant_away = Probabilities { home: 10.0, draw: 20.0, away: 70.0 };
        assert_eq!(predict_score(&dominant_away, 0, 15), (0, 3));
        assert_eq!(predict_score(&dominant_away, 0, 11), (1, 3));

        let narrow_away = Probabilities { home: 30.0, draw: 30.0, away: 40.0 };
        assert_eq!(predict_score(&narrow_away, 0, 15), (1, 2));
    }

    #[test]
    fn test_missing_table_data_defaults() {
        let snapshot = SideSnapshot::new(7, None, None);
        assert_eq!(snapshot.position, DEFAULT_POSITION);
        assert_eq!(snapshot.points, 0);
    }
}
