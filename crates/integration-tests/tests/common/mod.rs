//! Shared wiring: SQLite in memory, scripted feed, fixed clock

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use matchday_core::application::{Operations, PredictionService, SyncService, SyncSettings};
use matchday_core::port::mocks::{FixedTimeProvider, SequentialIdProvider, StubFeed};
use matchday_core::port::{MatchesPayload, Repositories, ScorersPayload, StandingsPayload};
use matchday_infra_sqlite::{create_pool, repositories, run_migrations};
use serde_json::{json, Value};

/// 2026-10-19T12:00:00Z
pub const NOW: i64 = 1_792_411_200_000;

pub struct System {
    pub ops: Operations,
    pub repos: Repositories,
    pub feed: Arc<StubFeed>,
    pub clock: Arc<FixedTimeProvider>,
}

pub async fn system(feed: StubFeed) -> System {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    let repos = repositories(pool);

    let feed = Arc::new(feed);
    let ids = Arc::new(SequentialIdProvider::new());
    let clock = Arc::new(FixedTimeProvider::new(NOW));

    let sync = SyncService::new(feed.clone(), &repos, ids.clone(), clock.clone()).with_settings(
        SyncSettings {
            squad_delay: Duration::from_millis(1),
            season_override: None,
        },
    );
    let predictions = PredictionService::new(&repos, ids, clock.clone());
    let ops = Operations::new(sync, predictions, repos.clone());

    System {
        ops,
        repos,
        feed,
        clock,
    }
}

pub fn table_row(position: i32, id: i64, name: &str, points: i32) -> Value {
    json!({
        "position": position,
        "team": { "id": id, "name": name, "shortName": name.trim_end_matches(" FC"), "tla": "XXX" },
        "playedGames": 8, "won": points / 3, "draw": points % 3, "lost": 8 - points / 3 - points % 3,
        "points": points, "goalsFor": 14, "goalsAgainst": 9, "goalDifference": 5
    })
}

/// Arsenal (57), Chelsea (61), Liverpool (64), Burnley (328)
pub fn league_table() -> StandingsPayload {
    StubFeed::payload(json!({
        "standings": [{
            "type": "TOTAL",
            "table": [
                table_row(1, 64, "Liverpool FC", 21),
                table_row(2, 57, "Arsenal FC", 19),
                table_row(3, 61, "Chelsea FC", 17),
                table_row(20, 328, "Burnley FC", 2)
            ]
        }]
    }))
}

pub fn fixture(id: i64, date: &str, status: &str, home: &str, away: &str, week: i32) -> Value {
    json!({
        "id": id, "utcDate": date, "status": status, "matchday": week,
        "homeTeam": { "name": home }, "awayTeam": { "name": away },
        "score": { "fullTime": { "home": null, "away": null } }
    })
}

pub fn finished(id: i64, date: &str, home: &str, away: &str, week: i32, score: (i32, i32)) -> Value {
    json!({
        "id": id, "utcDate": date, "status": "FINISHED", "matchday": week,
        "homeTeam": { "name": home }, "awayTeam": { "name": away },
        "score": { "fullTime": { "home": score.0, "away": score.1 } }
    })
}

pub fn fixtures(items: Vec<Value>) -> MatchesPayload {
    StubFeed::payload(json!({ "matches": items }))
}

pub fn scorers(items: Vec<Value>) -> ScorersPayload {
    StubFeed::payload(json!({ "scorers": items }))
}

pub fn scorer(id: i64, name: &str, team: i64, goals: i32) -> Value {
    json!({
        "player": { "id": id, "name": name, "section": "Offence", "nationality": "England" },
        "team": { "id": team },
        "goals": goals, "assists": 1, "playedMatches": 8
    })
}
