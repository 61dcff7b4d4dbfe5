// Standings feed -> Club

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use super::report::{Applied, FeedSyncStats};
use super::resolver::{EntityResolver, Resolution};
use super::SyncService;
use crate::domain::Club;
use crate::error::Result;
use crate::port::{ClubRepository, FeedRecord, TableEntry};

/// Club by exact (case-sensitive) name
pub struct ClubByName {
    clubs: Arc<dyn ClubRepository>,
}

impl ClubByName {
    pub fn new(clubs: Arc<dyn ClubRepository>) -> Self {
        Self { clubs }
    }
}

#[async_trait]
impl EntityResolver<TableEntry> for ClubByName {
    type Entity = Club;
    type Anchor = ();

    async fn resolve(&self, entry: &TableEntry) -> Result<Resolution<Club, ()>> {
        Ok(match self.clubs.find_by_name(&entry.team.name).await? {
            Some(club) => Resolution::Existing {
                entity: club,
                anchor: (),
            },
            None => Resolution::New { anchor: () },
        })
    }
}

/// Overwrite every feed-owned column; locally maintained ones are untouched
fn apply_table_entry(club: &mut Club, entry: &TableEntry, now: i64) {
    club.external_id = Some(entry.team.id);
    club.short_name = entry.team.short_name.clone();
    club.tla = entry.team.tla.clone();
    club.crest_url = entry.team.crest.clone();
    club.logo_url = entry.team.crest.clone();

    club.position = Some(entry.position);
    club.played_games = Some(entry.played_games);
    club.won = Some(entry.won);
    club.draw = Some(entry.draw);
    club.lost = Some(entry.lost);
    club.points = Some(entry.points);
    club.goals_for = Some(entry.goals_for);
    club.goals_against = Some(entry.goals_against);
    club.goal_difference = Some(entry.goal_difference);
    club.updated_at = now;
}

impl SyncService {
    /// Reconcile the TOTAL league table into clubs
    pub(super) async fn sync_standings(&self) -> Result<FeedSyncStats> {
        let payload = self.feed.standings().await?;
        let mut stats = FeedSyncStats::default();

        for group in payload.standings.iter().filter(|g| g.is_total()) {
            for record in &group.table {
                match record {
                    FeedRecord::Valid(entry) => match self.upsert_club(entry).await {
                        Ok(applied) => stats.record(applied),
                        Err(e) => {
                            error!(club = %entry.team.name, error = %e, "Failed to store standing");
                            stats.failed += 1;
                        }
                    },
                    FeedRecord::Malformed(reason) => {
                        error!(feed = "standings", reason = %reason, "Skipping malformed table entry");
                        stats.malformed += 1;
                    }
                }
            }
        }

        info!(
            feed = "standings",
            teams = stats.touched(),
            created = stats.created,
            updated = stats.updated,
            malformed = stats.malformed,
            "Standings synced"
        );
        Ok(stats)
    }

    async fn upsert_club(&self, entry: &TableEntry) -> Result<Applied> {
        let now = self.clock.now_millis();
        let (mut club, applied) = match self.resolvers.standings.resolve(entry).await? {
            Resolution::Existing { entity, .. } => (entity, Applied::Updated),
            Resolution::New { .. } => (
                Club::new(self.ids.generate_id(), entry.team.name.clone(), now),
                Applied::Created,
            ),
            Resolution::Gap(reason) => {
                warn!(club = %entry.team.name, reason = %reason, "Standing not applied");
                return Ok(Applied::Skipped);
            }
        };

        apply_table_entry(&mut club, entry, now);
        match applied {
            Applied::Created => {
                info!(club = %club.name, position = entry.position, "Creating club from standings");
                self.clubs.insert(&club).await?;
            }
            _ => self.clubs.update(&club).await?,
        }
        debug!(
            club = %club.name,
            position = entry.position,
            points = entry.points,
            won = entry.won,
            draw = entry.draw,
            lost = entry.lost,
            goal_difference = entry.goal_difference,
            "Saved standing"
        );
        Ok(applied)
    }
}
