// Prediction Domain Model

use serde::{Deserialize, Serialize};

use super::error::{DomainError, Result};
use super::fixture::MatchId;

/// Prediction ID (UUID v4)
pub type PredictionId = String;

/// Tolerance for the three-probabilities-sum-to-100 invariant
pub const PROBABILITY_SUM_TOLERANCE: f64 = 0.01;

/// Predicted Outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl Outcome {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "HOME_WIN" => Ok(Outcome::HomeWin),
            "DRAW" => Ok(Outcome::Draw),
            "AWAY_WIN" => Ok(Outcome::AwayWin),
            other => Err(DomainError::UnknownOutcome(other.to_string())),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::HomeWin => write!(f, "HOME_WIN"),
            Outcome::Draw => write!(f, "DRAW"),
            Outcome::AwayWin => write!(f, "AWAY_WIN"),
        }
    }
}

/// Prediction Entity
///
/// Created once per match and never partially mutated. Form points and table
/// positions are a snapshot taken at generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: PredictionId,
    pub match_id: MatchId,

    pub predicted_home_score: i32,
    pub predicted_away_score: i32,
    pub outcome: Outcome,

    // Percentage points, sum to 100
    pub home_win_probability: f64,
    pub draw_probability: f64,
    pub away_win_probability: f64,
    pub confidence: f64,

    pub reasoning: String,

    // Snapshot
    pub home_form_points: i32,
    pub away_form_points: i32,
    pub home_position: i32,
    pub away_position: i32,

    pub created_at: i64,
}

impl Prediction {
    /// Check the probability invariants of a stored prediction
    pub fn validate(&self) -> Result<()> {
        let total = self.home_win_probability + self.draw_probability + self.away_win_probability;
        if (total - 100.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(DomainError::ProbabilitySum(total));
        }
        let max = self
            .home_win_probability
            .max(self.draw_probability)
            .max(self.away_win_probability);
        if (self.confidence - max).abs() > f64::EPSILON {
            return Err(DomainError::ValidationError(format!(
                "confidence {:.2} is not the largest probability {:.2}",
                self.confidence, max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Prediction {
        Prediction {
            id: "p1".to_string(),
            match_id: "m1".to_string(),
            predicted_home_score: 2,
            predicted_away_score: 1,
            outcome: Outcome::HomeWin,
            home_win_probability: 45.0,
            draw_probability: 28.0,
            away_win_probability: 27.0,
            confidence: 45.0,
            reasoning: String::new(),
            home_form_points: 9,
            away_form_points: 6,
            home_position: 3,
            away_position: 11,
            created_at: 0,
        }
    }

    #[test]
    fn test_outcome_storage_form() {
        for outcome in [Outcome::HomeWin, Outcome::Draw, Outcome::AwayWin] {
            assert_eq!(Outcome::parse(&outcome.to_string()).unwrap(), outcome);
        }
        assert!(Outcome::parse("WIN").is_err());
    }

    #[test]
    fn test_validate_sum_and_confidence() {
        let prediction = sample();
        assert!(prediction.validate().is_ok());

        let mut bad_sum = sample();
        bad_sum.draw_probability = 30.0;
        assert!(matches!(
            bad_sum.validate(),
            Err(DomainError::ProbabilitySum(_))
        ));

        let mut bad_confidence = sample();
        bad_confidence.confidence = 28.0;
        assert!(bad_confidence.validate().is_err());
    }
}
