//! Predictions over synced SQLite data: batching, regeneration and queries

mod common;

use std::collections::HashSet;

use common::*;
use matchday_core::application::PredictionFilter;
use matchday_core::domain::Outcome;
use matchday_core::port::mocks::StubFeed;
use matchday_core::port::{ClubRepository, MatchRepository, PredictionRepository};
use serde_json::Value;

const CLUBS: [&str; 4] = ["Liverpool FC", "Arsenal FC", "Chelsea FC", "Burnley FC"];

/// Twelve scheduled matches on consecutive days, four per match week (9-11)
fn season_run() -> Vec<Value> {
    (0..12)
        .map(|i: usize| {
            let home = CLUBS[i % 4];
            let away = CLUBS[(i + 1 + (i / 4) % 3) % 4];
            let date = format!("2026-10-{:02}T15:00:00Z", 20 + i);
            fixture(200 + i as i64, &date, "TIMED", home, away, 9 + (i / 4) as i32)
        })
        .collect()
}

async fn synced(matches: Vec<Value>) -> System {
    let feed = StubFeed::new()
        .with_standings(league_table())
        .with_matches(fixtures(matches));
    let sys = system(feed).await;
    let report = sys.ops.refresh_all().await.unwrap();
    assert!(report.failed_steps().is_empty());
    sys
}

#[tokio::test]
async fn test_batches_cover_soonest_matches_first() {
    let sys = synced(season_run()).await;

    let first = sys.ops.generate_predictions().await.unwrap();
    assert_eq!((first.considered, first.created, first.failed), (10, 10, 0));

    let second = sys.ops.generate_predictions().await.unwrap();
    assert_eq!(second.created, 2);

    let third = sys.ops.generate_predictions().await.unwrap();
    assert_eq!(third.created, 0);
    assert_eq!(sys.repos.predictions.count().await.unwrap(), 12);
}

#[tokio::test]
async fn test_regenerate_keeps_one_prediction_per_match() {
    let sys = synced(season_run()).await;
    sys.ops.generate_predictions().await.unwrap();
    sys.ops.generate_predictions().await.unwrap();

    let report = sys.ops.regenerate_predictions().await.unwrap();
    assert_eq!(report.created, 10);

    let all = sys.ops.predictions(PredictionFilter::All).await.unwrap();
    assert_eq!(all.len(), 10);
    let distinct: HashSet<_> = all.iter().map(|p| p.match_id.clone()).collect();
    assert_eq!(distinct.len(), all.len());
}

#[tokio::test]
async fn test_stored_predictions_are_consistent() {
    let sys = synced(season_run()).await;
    sys.ops.generate_predictions().await.unwrap();

    for prediction in sys.ops.predictions(PredictionFilter::All).await.unwrap() {
        let total = prediction.home_win_probability
            + prediction.draw_probability
            + prediction.away_win_probability;
        assert!((total - 100.0).abs() < 0.01, "probabilities sum to {}", total);
        assert!(prediction.predicted_home_score >= 0 && prediction.predicted_away_score >= 0);
        assert!(!prediction.reasoning.is_empty());

        let fixture = sys.repos.matches.find_by_id(&prediction.match_id).await.unwrap().unwrap();
        let home = sys.repos.clubs.find_by_id(&fixture.home_club_id).await.unwrap().unwrap();
        let away = sys.repos.clubs.find_by_id(&fixture.away_club_id).await.unwrap().unwrap();
        assert_eq!(Some(prediction.home_position), home.position);
        assert_eq!(Some(prediction.away_position), away.position);
    }
}

#[tokio::test]
async fn test_leader_at_home_to_bottom_side_is_home_win() {
    let sys = synced(vec![fixture(
        300,
        "2026-10-24T14:00:00Z",
        "TIMED",
        "Liverpool FC",
        "Burnley FC",
        9,
    )])
    .await;
    sys.ops.generate_predictions().await.unwrap();

    let predictions = sys.ops.predictions(PredictionFilter::All).await.unwrap();
    assert_eq!(predictions.len(), 1);
    let prediction = &predictions[0];
    assert_eq!(prediction.outcome, Outcome::HomeWin);
    assert!(prediction.predicted_home_score > prediction.predicted_away_score);
    assert!(prediction.home_win_probability > prediction.away_win_probability);
}

#[tokio::test]
async fn test_only_scheduled_matches_are_predicted() {
    let sys = synced(vec![
        fixture(400, "2026-10-24T14:00:00Z", "TIMED", "Liverpool FC", "Burnley FC", 9),
        fixture(401, "2026-10-24T16:30:00Z", "POSTPONED", "Arsenal FC", "Chelsea FC", 9),
        finished(402, "2026-10-04T14:00:00Z", "Chelsea FC", "Liverpool FC", 7, (1, 1)),
    ])
    .await;

    let report = sys.ops.generate_predictions().await.unwrap();
    assert_eq!(report.created, 1);
}

#[tokio::test]
async fn test_list_filters() {
    let sys = synced(season_run()).await;
    sys.ops.generate_predictions().await.unwrap();
    sys.ops.generate_predictions().await.unwrap();

    let upcoming = sys.ops.predictions(PredictionFilter::Upcoming).await.unwrap();
    assert_eq!(upcoming.len(), 10);

    let week_eleven = sys.ops.predictions(PredictionFilter::Week(11)).await.unwrap();
    assert_eq!(week_eleven.len(), 4);
    assert!(sys.ops.predictions(PredictionFilter::Week(30)).await.unwrap().is_empty());

    let removed = sys.ops.clear_predictions().await.unwrap();
    assert_eq!(removed, 12);
    assert!(sys.ops.predictions(PredictionFilter::All).await.unwrap().is_empty());
}
