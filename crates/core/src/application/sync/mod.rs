// Sync Orchestrator - feed -> resolve -> upsert
//
// Runs standings, fixtures and scorers in that order; later steps need the
// clubs earlier steps create. Each step contains its own failures.

mod fixtures;
pub mod mapping;
mod report;
pub mod resolver;
mod scorers;
mod squad;
mod standings;

pub use fixtures::{FixtureBySidesAndDay, FixtureSides};
pub use report::{Applied, FeedSyncStats, StepOutcome, SyncReport};
pub use resolver::{EntityResolver, Resolution, Resolvers};
pub use scorers::ScorerByName;
pub use squad::{SquadEntry, SquadMemberByName};
pub use standings::ClubByName;

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::application::jobs::constants::DEFAULT_SQUAD_DELAY;
use crate::domain::Club;
use crate::error::Result;
use crate::port::{
    ClubRepository, FootballFeed, IdProvider, MatchRepository, PlayerRepository, Repositories,
    TimeProvider,
};

/// Tunables for a sync run
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Pause between per-club squad fetches
    pub squad_delay: Duration,
    /// Fixtures season year; derived from today when unset
    pub season_override: Option<i32>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            squad_delay: DEFAULT_SQUAD_DELAY,
            season_override: None,
        }
    }
}

/// Reconciles the three feeds (and on-demand squads) into the store
pub struct SyncService {
    feed: Arc<dyn FootballFeed>,
    clubs: Arc<dyn ClubRepository>,
    players: Arc<dyn PlayerRepository>,
    matches: Arc<dyn MatchRepository>,
    ids: Arc<dyn IdProvider>,
    clock: Arc<dyn TimeProvider>,
    resolvers: Resolvers,
    settings: SyncSettings,
}

impl SyncService {
    /// Create a sync service with name-keyed resolvers and default settings
    pub fn new(
        feed: Arc<dyn FootballFeed>,
        repos: &Repositories,
        ids: Arc<dyn IdProvider>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        let resolvers = Resolvers::name_keyed(
            Arc::clone(&repos.clubs),
            Arc::clone(&repos.players),
            Arc::clone(&repos.matches),
        );
        Self {
            feed,
            clubs: Arc::clone(&repos.clubs),
            players: Arc::clone(&repos.players),
            matches: Arc::clone(&repos.matches),
            ids,
            clock,
            resolvers,
            settings: SyncSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: SyncSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Swap in different resolution strategies
    pub fn with_resolvers(mut self, resolvers: Resolvers) -> Self {
        self.resolvers = resolvers;
        self
    }

    /// Run standings, fixtures and scorers sync, in that order
    ///
    /// A failing step is logged and recorded in the report; the remaining steps
    /// still run. Never returns an error itself: only a panic can escape, and
    /// the job gate turns that into `SyncFailed`.
    pub async fn refresh_all(&self) -> SyncReport {
        let started_at = self.clock.now_millis();
        info!("Starting full feed sync");

        let standings = step_outcome("standings", self.sync_standings().await);
        let fixtures = step_outcome("fixtures", self.sync_fixtures().await);
        let scorers = step_outcome("scorers", self.sync_scorers().await);

        let report = SyncReport {
            standings,
            fixtures,
            scorers,
            started_at,
            finished_at: self.clock.now_millis(),
        };
        let failed = report.failed_steps();
        if failed.is_empty() {
            info!(
                duration_ms = report.finished_at - report.started_at,
                "Full feed sync completed"
            );
        } else {
            error!(failed_steps = ?failed, "Full feed sync completed with failed steps");
        }
        report
    }

    /// Fetch squads for every club with an external id
    ///
    /// Clubs are fetched one after another with a fixed pause in between.
    /// A failing club is logged and skipped. Returns the number of clubs whose
    /// squad was reconciled.
    pub async fn refresh_all_squads(&self) -> Result<usize> {
        let clubs: Vec<Club> = self
            .clubs
            .find_all()
            .await?
            .into_iter()
            .filter(|c| c.external_id.is_some())
            .collect();
        info!(clubs = clubs.len(), "Fetching squads for all clubs");

        let mut processed = 0;
        for (i, club) in clubs.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.settings.squad_delay).await;
            }
            let Some(external_id) = club.external_id else {
                continue;
            };
            match self.refresh_squad(external_id, club).await {
                Ok(_) => processed += 1,
                Err(e) => error!(club = %club.name, external_id, error = %e, "Squad fetch failed"),
            }
        }

        info!(processed, "Squad fetch completed");
        Ok(processed)
    }
}

fn step_outcome(step: &'static str, result: Result<FeedSyncStats>) -> StepOutcome {
    match result {
        Ok(stats) => StepOutcome::Completed(stats),
        Err(e) => {
            error!(step, error = %e, "Sync step failed, continuing with next step");
            StepOutcome::Failed(e.to_string())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::port::mocks::{Endpoint, StubBehavior, StubFeed};

    #[tokio::test]
    async fn test_steps_run_in_dependency_order() {
        let h = harness(StubFeed::new().with_standings(three_club_table()));
        let report = h.service.refresh_all().await;

        assert_eq!(
            h.feed.calls(),
            vec![Endpoint::Standings, Endpoint::Matches, Endpoint::Scorers]
        );
        assert!(report.failed_steps().is_empty());
        assert_eq!(report.started_at, NOW);
    }

    #[tokio::test]
    async fn test_failed_step_does_not_stop_later_steps() {
        let h = harness(
            StubFeed::new()
                .with_standings(three_club_table())
                .with_matches(matches(vec![fixture(
                    1,
                    "2026-10-24T14:00:00Z",
                    "TIMED",
                    "Arsenal FC",
                    "Chelsea FC",
                    (None, None),
                )])),
        );
        h.feed
            .set_behavior(Endpoint::Standings, StubBehavior::Fail("connection reset".into()));

        let report = h.service.refresh_all().await;

        assert_eq!(report.failed_steps(), vec!["standings"]);
        assert!(matches!(&report.standings, StepOutcome::Failed(msg) if msg.contains("connection reset")));
        // Fixtures ran but found no clubs: every record is a resolution gap
        assert_eq!(
            report.fixtures,
            StepOutcome::Completed(FeedSyncStats {
                skipped: 1,
                ..Default::default()
            })
        );
        assert_eq!(h.feed.call_count(Endpoint::Scorers), 1);
    }

    #[tokio::test]
    async fn test_fixtures_season_defaults_to_current_season_start() {
        let h = harness(StubFeed::new());
        h.service.refresh_all().await;
        assert_eq!(h.feed.last_season(), 2026);
    }

    #[tokio::test]
    async fn test_all_squads_skips_failures_and_clubs_without_external_id() {
        let h = harness(
            StubFeed::new()
                .with_standings(three_club_table())
                .with_team(64, StubFeed::payload(serde_json::json!({ "squad": [{ "name": "Alisson", "position": "Goalkeeper" }] })))
                .with_team(57, StubFeed::payload(serde_json::json!({ "squad": [] }))),
        );
        h.service.refresh_all().await;

        // Local-only club: never fetched
        ClubRepository::insert(h.store.as_ref(), &Club::new("local", "Local Select XI", NOW))
            .await
            .unwrap();

        // Chelsea (61) is not scripted -> 404 -> logged and skipped
        let processed = h.service.refresh_all_squads().await.unwrap();
        assert_eq!(processed, 2);
        assert_eq!(h.feed.call_count(Endpoint::Team), 3);
    }
}
