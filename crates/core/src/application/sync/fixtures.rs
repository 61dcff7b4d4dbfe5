// Fixtures feed -> Match

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::mapping::{season_label, season_start_year};
use super::report::{Applied, FeedSyncStats};
use super::resolver::{EntityResolver, Resolution};
use super::SyncService;
use crate::domain::{Club, Match, MatchStatus};
use crate::error::Result;
use crate::port::{ClubRepository, FeedRecord, FixtureEntry, MatchRepository};

/// Both clubs of a resolved fixture
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureSides {
    pub home: Club,
    pub away: Club,
}

/// Clubs by exact name, then the home club's match against the same away
/// club on the same calendar day
pub struct FixtureBySidesAndDay {
    clubs: Arc<dyn ClubRepository>,
    matches: Arc<dyn MatchRepository>,
}

impl FixtureBySidesAndDay {
    pub fn new(clubs: Arc<dyn ClubRepository>, matches: Arc<dyn MatchRepository>) -> Self {
        Self { clubs, matches }
    }
}

#[async_trait]
impl EntityResolver<FixtureEntry> for FixtureBySidesAndDay {
    type Entity = Match;
    type Anchor = FixtureSides;

    async fn resolve(&self, entry: &FixtureEntry) -> Result<Resolution<Match, FixtureSides>> {
        let home = self.clubs.find_by_name(&entry.home_team.name).await?;
        let away = self.clubs.find_by_name(&entry.away_team.name).await?;
        let (home, away) = match (home, away) {
            (Some(home), Some(away)) => (home, away),
            _ => {
                return Ok(Resolution::Gap(format!(
                    "no local club for {} vs {}",
                    entry.home_team.name, entry.away_team.name
                )))
            }
        };

        let day = entry.utc_date.date_naive();
        let existing = self
            .matches
            .find_by_club(&home.id)
            .await?
            .into_iter()
            .find(|m| m.home_club_id == home.id && m.away_club_id == away.id && m.match_day() == day);

        let anchor = FixtureSides { home, away };
        Ok(match existing {
            Some(entity) => Resolution::Existing { entity, anchor },
            None => Resolution::New { anchor },
        })
    }
}

impl SyncService {
    /// Reconcile the season's fixtures into matches
    pub(super) async fn sync_fixtures(&self) -> Result<FeedSyncStats> {
        let season = self
            .settings
            .season_override
            .unwrap_or_else(|| season_start_year(self.clock.today()));
        let payload = self.feed.matches(season).await?;
        let mut stats = FeedSyncStats::default();

        for record in &payload.matches {
            match record {
                FeedRecord::Valid(entry) => match self.upsert_fixture(entry).await {
                    Ok(applied) => stats.record(applied),
                    Err(e) => {
                        error!(fixture_id = entry.id, error = %e, "Failed to store fixture");
                        stats.failed += 1;
                    }
                },
                FeedRecord::Malformed(reason) => {
                    error!(feed = "fixtures", reason = %reason, "Skipping malformed fixture");
                    stats.malformed += 1;
                }
            }
        }

        info!(
            feed = "fixtures",
            season,
            matches = stats.touched(),
            created = stats.created,
            updated = stats.updated,
            skipped = stats.skipped,
            "Fixtures synced"
        );
        Ok(stats)
    }

    async fn upsert_fixture(&self, entry: &FixtureEntry) -> Result<Applied> {
        let now = self.clock.now_millis();
        let (mut fixture, sides, applied) = match self.resolvers.fixtures.resolve(entry).await? {
            Resolution::Existing { entity, anchor } => (entity, anchor, Applied::Updated),
            Resolution::New { anchor } => {
                let fixture = Match::new(
                    self.ids.generate_id(),
                    anchor.home.id.clone(),
                    anchor.away.id.clone(),
                    entry.utc_date,
                    now,
                )?;
                (fixture, anchor, Applied::Created)
            }
            Resolution::Gap(reason) => {
                warn!(fixture_id = entry.id, reason = %reason, "Skipping fixture");
                return Ok(Applied::Skipped);
            }
        };

        fixture.home_score = entry.score.full_time.home;
        fixture.away_score = entry.score.full_time.away;
        fixture.match_week = entry.matchday;
        fixture.venue = entry.venue.clone().or_else(|| sides.home.stadium.clone());
        fixture.status = MatchStatus::from_feed(&entry.status);
        // Labelled from today, not from the fixture date
        fixture.season = Some(season_label(self.clock.today()));
        fixture.updated_at = now;

        match applied {
            Applied::Created => self.matches.insert(&fixture).await?,
            _ => self.matches.update(&fixture).await?,
        }
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::domain::MatchStatus;
    use crate::port::mocks::StubFeed;
    use crate::port::{ClubRepository, MatchRepository};

    fn derby_on(date: &str, status: &str, score: (Option<i32>, Option<i32>)) -> crate::port::MatchesPayload {
        matches(vec![fixture(1, date, status, "Arsenal FC", "Chelsea FC", score)])
    }

    #[tokio::test]
    async fn test_same_day_fixture_updates_in_place() {
        let h = harness(
            StubFeed::new()
                .with_standings(three_club_table())
                .with_matches(derby_on("2026-10-04T11:30:00Z", "TIMED", (None, None))),
        );
        h.service.sync_standings().await.unwrap();

        let first = h.service.sync_fixtures().await.unwrap();
        assert_eq!(first.created, 1);

        // Kick-off moved within the same day and the result came in
        h.feed
            .set_matches(derby_on("2026-10-04T16:30:00Z", "FINISHED", (Some(2), Some(1))));
        let second = h.service.sync_fixtures().await.unwrap();
        assert_eq!((second.created, second.updated), (0, 1));

        let all = h.store.find_by_status(MatchStatus::Finished).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!((all[0].home_score, all[0].away_score), (Some(2), Some(1)));
        assert_eq!(MatchRepository::count(h.store.as_ref()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_club_skips_only_that_record() {
        let payload = matches(vec![
            fixture(1, "2026-10-24T14:00:00Z", "TIMED", "Arsenal FC", "Newcastle United FC", (None, None)),
            fixture(2, "2026-10-25T14:00:00Z", "SCHEDULED", "Chelsea FC", "Liverpool FC", (None, None)),
        ]);
        let h = harness(StubFeed::new().with_standings(three_club_table()).with_matches(payload));
        h.service.sync_standings().await.unwrap();

        let stats = h.service.sync_fixtures().await.unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.created, 1);
    }

    #[tokio::test]
    async fn test_fields_overwritten_from_feed() {
        let h = harness(
            StubFeed::new()
                .with_standings(three_club_table())
                .with_matches(derby_on("2026-05-10T14:00:00Z", "IN_PLAY", (Some(0), Some(0)))),
        );
        h.service.sync_standings().await.unwrap();

        let mut arsenal = h.store.find_by_name("Arsenal FC").await.unwrap().unwrap();
        arsenal.stadium = Some("Emirates Stadium".to_string());
        ClubRepository::update(h.store.as_ref(), &arsenal).await.unwrap();

        h.service.sync_fixtures().await.unwrap();
        let live = h.store.find_by_status(MatchStatus::Live).await.unwrap();
        assert_eq!(live.len(), 1);
        let m = &live[0];
        assert_eq!(m.venue.as_deref(), Some("Emirates Stadium"));
        assert_eq!(m.match_week, Some(9));
        // Season label follows today's date, not the fixture's
        assert_eq!(m.season.as_deref(), Some("2026/27"));
        assert_eq!(m.home_club_id, arsenal.id);
    }
}
