// Prediction Engine - batch generation and queries

pub mod model;
mod reasoning;

pub use model::{Probabilities, SideSnapshot};
pub use reasoning::{explain, ReasoningInput};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::application::jobs::constants::{PREDICTION_BATCH_SIZE, UPCOMING_PREDICTIONS_LIMIT};
use crate::domain::{Club, ClubId, Match, MatchStatus, Prediction};
use crate::error::{AppError, Result};
use crate::port::{
    ClubRepository, IdProvider, MatchRepository, PredictionRepository, Repositories, TimeProvider,
};

/// Counters for one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Unpredicted scheduled matches selected (at most the batch size)
    pub considered: usize,
    pub created: usize,
    pub failed: usize,
}

/// Which predictions to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "week", rename_all = "snake_case")]
pub enum PredictionFilter {
    All,
    /// Scheduled matches only, soonest first
    Upcoming,
    Week(i32),
}

/// Generates, clears and lists match predictions
pub struct PredictionService {
    clubs: Arc<dyn ClubRepository>,
    matches: Arc<dyn MatchRepository>,
    predictions: Arc<dyn PredictionRepository>,
    ids: Arc<dyn IdProvider>,
    clock: Arc<dyn TimeProvider>,
    batch_size: usize,
}

impl PredictionService {
    pub fn new(repos: &Repositories, ids: Arc<dyn IdProvider>, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            clubs: Arc::clone(&repos.clubs),
            matches: Arc::clone(&repos.matches),
            predictions: Arc::clone(&repos.predictions),
            ids,
            clock,
            batch_size: PREDICTION_BATCH_SIZE,
        }
    }

    /// Predict the soonest scheduled matches that have no prediction yet
    ///
    /// Lookup-then-create is not atomic; callers serialize through the job
    /// gate. A match that fails is logged and skipped.
    pub async fn generate_batch(&self) -> Result<BatchReport> {
        let mut candidates = Vec::with_capacity(self.batch_size);
        for fixture in self.matches.find_by_status(MatchStatus::Scheduled).await? {
            if candidates.len() == self.batch_size {
                break;
            }
            if self.predictions.find_by_match(&fixture.id).await?.is_none() {
                candidates.push(fixture);
            }
        }
        info!(matches = candidates.len(), "Generating predictions for upcoming matches");

        let mut report = BatchReport {
            considered: candidates.len(),
            ..Default::default()
        };
        for fixture in &candidates {
            match self.predict_and_store(fixture).await {
                Ok(prediction) => {
                    report.created += 1;
                    info!(
                        match_id = %fixture.id,
                        outcome = %prediction.outcome,
                        score = %format!("{}-{}", prediction.predicted_home_score, prediction.predicted_away_score),
                        confidence = prediction.confidence,
                        "Generated prediction"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    error!(match_id = %fixture.id, error = %e, "Failed to generate prediction");
                }
            }
        }

        info!(
            created = report.created,
            failed = report.failed,
            "Prediction generation completed"
        );
        Ok(report)
    }

    async fn predict_and_store(&self, fixture: &Match) -> Result<Prediction> {
        let prediction = self.predict(fixture).await?;
        self.predictions.insert(&prediction).await?;
        Ok(prediction)
    }

    /// Compute (without storing) a prediction for one match
    pub async fn predict(&self, fixture: &Match) -> Result<Prediction> {
        let home = self.club(&fixture.home_club_id).await?;
        let away = self.club(&fixture.away_club_id).await?;

        let home_form = self.form_points(&home.id).await?;
        let away_form = self.form_points(&away.id).await?;
        let home_side = SideSnapshot::new(home_form, home.position, home.points);
        let away_side = SideSnapshot::new(away_form, away.position, away.points);

        let probabilities = model::win_probabilities(&home_side, &away_side);
        let (home_score, away_score) = model::predict_score(&probabilities, home_form, away_form);
        let reasoning = explain(&ReasoningInput {
            home: &home,
            away: &away,
            home_form,
            away_form,
            home_position: home_side.position,
            away_position: away_side.position,
        });

        let prediction = Prediction {
            id: self.ids.generate_id(),
            match_id: fixture.id.clone(),
            predicted_home_score: home_score,
            predicted_away_score: away_score,
            outcome: probabilities.outcome(),
            home_win_probability: probabilities.home,
            draw_probability: probabilities.draw,
            away_win_probability: probabilities.away,
            confidence: probabilities.confidence(),
            reasoning,
            home_form_points: home_form,
            away_form_points: away_form,
            home_position: home_side.position,
            away_position: away_side.position,
            created_at: self.clock.now_millis(),
        };
        prediction.validate()?;
        Ok(prediction)
    }

    async fn club(&self, id: &ClubId) -> Result<Club> {
        self.clubs
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("club {}", id)))
    }

    async fn form_points(&self, club_id: &ClubId) -> Result<i32> {
        let recent = model::recent_finished(self.matches.find_by_club(club_id).await?);
        Ok(model::form_points(club_id, &recent))
    }

    /// Delete every prediction
    pub async fn clear_all(&self) -> Result<u64> {
        info!("Clearing all predictions");
        let removed = self.predictions.delete_all().await?;
        info!(removed, "All predictions cleared");
        Ok(removed)
    }

    /// Clear everything, then run a fresh batch
    pub async fn regenerate(&self) -> Result<BatchReport> {
        info!("Regenerating predictions, clearing old ones first");
        self.clear_all().await?;
        self.generate_batch().await
    }

    pub async fn list(&self, filter: PredictionFilter) -> Result<Vec<Prediction>> {
        match filter {
            PredictionFilter::All => self.list_all().await,
            PredictionFilter::Upcoming => self.list_upcoming().await,
            PredictionFilter::Week(week) => self.list_for_week(week).await,
        }
    }

    /// Every prediction, newest first
    pub async fn list_all(&self) -> Result<Vec<Prediction>> {
        self.predictions.find_all().await
    }

    /// Predictions for still-scheduled matches, soonest kick-off first
    pub async fn list_upcoming(&self) -> Result<Vec<Prediction>> {
        let mut upcoming = self
            .predictions
            .find_by_match_status(MatchStatus::Scheduled)
            .await?;
        upcoming.truncate(UPCOMING_PREDICTIONS_LIMIT);
        Ok(upcoming)
    }

    pub async fn list_for_week(&self, match_week: i32) -> Result<Vec<Prediction>> {
        self.predictions.find_by_match_week(match_week).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Outcome;
    use crate::port::mocks::{FixedTimeProvider, InMemoryStore, SequentialIdProvider};
    use chrono::{Duration, TimeZone, Utc};

    struct Fixture {
        store: Arc<InMemoryStore>,
        service: PredictionService,
    }

    fn setup() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let repos = InMemoryStore::repositories(Arc::clone(&store));
        let service = PredictionService::new(
            &repos,
            Arc::new(SequentialIdProvider::new()),
            Arc::new(FixedTimeProvider::new(1_000)),
        );
        Fixture { store, service }
    }

    async fn add_club(store: &InMemoryStore, id: &str, position: Option<i32>, points: Option<i32>) {
        let mut club = Club::new(id, format!("{id} FC"), 0);
        club.position = position;
        club.points = points;
        ClubRepository::insert(store, &club).await.unwrap();
    }

    async fn add_match(store: &InMemoryStore, id: &str, home: &str, away: &str, days: i64, status: MatchStatus) -> Match {
        let date = Utc.with_ymd_and_hms(2026, 10, 19, 15, 0, 0).unwrap() + Duration::days(days);
        let mut m = Match::new(id, home, away, date, 0).unwrap();
        m.status = status;
        m.match_week = Some(if days < 7 { 9 } else { 10 });
        MatchRepository::insert(store, &m).await.unwrap();
        m
    }

    #[tokio::test]
    async fn test_batch_takes_ten_soonest_unpredicted() {
        let f = setup();
        add_club(&f.store, "a", Some(1), Some(20)).await;
        add_club(&f.store, "b", Some(20), Some(2)).await;

        // Twelve scheduled fixtures, inserted latest first
        for i in (0..12).rev() {
            add_match(&f.store, &format!("m{i:02}"), "a", "b", i, MatchStatus::Scheduled).await;
        }
        add_match(&f.store, "played", "a", "b", -3, MatchStatus::Finished).await;

        let first = f.service.generate_batch().await.unwrap();
        assert_eq!(first, BatchReport { considered: 10, created: 10, failed: 0 });
        assert!(f.store.find_by_match(&"m09".to_string()).await.unwrap().is_some());
        assert!(f.store.find_by_match(&"m10".to_string()).await.unwrap().is_none());

        // Next batch tops up the remaining two; nothing is duplicated
        let second = f.service.generate_batch().await.unwrap();
        assert_eq!((second.considered, second.created), (2, 2));
        assert_eq!(PredictionRepository::count(f.store.as_ref()).await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_prediction_snapshot_and_invariants() {
        let f = setup();
        add_club(&f.store, "top", Some(1), None).await;
        add_club(&f.store, "bottom", None, None).await;
        let fixture = add_match(&f.store, "m1", "top", "bottom", 2, MatchStatus::Scheduled).await;

        let prediction = f.service.predict(&fixture).await.unwrap();
        assert_eq!(prediction.outcome, Outcome::HomeWin);
        assert_eq!((prediction.predicted_home_score, prediction.predicted_away_score), (2, 1));
        assert_eq!((prediction.home_position, prediction.away_position), (1, 20));
        assert_eq!(prediction.confidence, prediction.home_win_probability);
        assert!(prediction.reasoning.starts_with("top FC (1) vs bottom FC (20). "));
        assert!(prediction.validate().is_ok());
    }

    #[tokio::test]
    async fn test_missing_club_fails_only_that_match() {
        let f = setup();
        add_club(&f.store, "a", Some(3), Some(10)).await;
        add_club(&f.store, "b", Some(9), Some(8)).await;
        add_club(&f.store, "gone", Some(12), Some(6)).await;
        add_match(&f.store, "m1", "a", "b", 1, MatchStatus::Scheduled).await;
        let orphan = add_match(&f.store, "m2", "a", "gone", 2, MatchStatus::Scheduled).await;

        // Leave the match row but drop its away club from under it
        let mut broken = orphan.clone();
        broken.away_club_id = "missing".to_string();
        MatchRepository::update(f.store.as_ref(), &broken).await.unwrap();

        let report = f.service.generate_batch().await.unwrap();
        assert_eq!(report, BatchReport { considered: 2, created: 1, failed: 1 });
    }

    #[tokio::test]
    async fn test_regenerate_resets_population() {
        let f = setup();
        add_club(&f.store, "a", Some(5), Some(12)).await;
        add_club(&f.store, "b", Some(6), Some(11)).await;
        let first = add_match(&f.store, "m1", "a", "b", 1, MatchStatus::Scheduled).await;
        add_match(&f.store, "m2", "b", "a", 8, MatchStatus::Scheduled).await;
        f.service.generate_batch().await.unwrap();
        let before = f.store.find_by_match(&first.id).await.unwrap().unwrap();

        let report = f.service.regenerate().await.unwrap();
        assert_eq!(report.created, 2);

        let all = f.service.list(PredictionFilter::All).await.unwrap();
        assert_eq!(all.len(), 2);
        let after = f.store.find_by_match(&first.id).await.unwrap().unwrap();
        assert_ne!(before.id, after.id);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let f = setup();
        add_club(&f.store, "a", Some(2), Some(15)).await;
        add_club(&f.store, "b", Some(14), Some(7)).await;
        let soon = add_match(&f.store, "m1", "a", "b", 1, MatchStatus::Scheduled).await;
        add_match(&f.store, "m2", "b", "a", 9, MatchStatus::Scheduled).await;
        f.service.generate_batch().await.unwrap();

        // Kick-off happened: no longer upcoming
        let mut live = soon.clone();
        live.status = MatchStatus::Live;
        MatchRepository::update(f.store.as_ref(), &live).await.unwrap();

        let upcoming = f.service.list(PredictionFilter::Upcoming).await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].match_id, "m2");

        let week9 = f.service.list(PredictionFilter::Week(9)).await.unwrap();
        assert_eq!(week9.len(), 1);
        assert_eq!(week9[0].match_id, "m1");

        assert_eq!(f.service.clear_all().await.unwrap(), 2);
        assert!(f.service.list(PredictionFilter::All).await.unwrap().is_empty());
    }
}
