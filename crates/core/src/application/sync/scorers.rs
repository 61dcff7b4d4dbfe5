// Scorers feed -> Player

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use super::mapping::{parse_birth_date, position_from_section};
use super::report::{Applied, FeedSyncStats};
use super::resolver::{EntityResolver, Resolution};
use super::SyncService;
use crate::domain::{Club, Player};
use crate::error::Result;
use crate::port::{ClubRepository, FeedRecord, PlayerRepository, ScorerEntry};

/// Club by external id; player by exact name across all clubs, then by
/// case-insensitive name within that club
pub struct ScorerByName {
    clubs: Arc<dyn ClubRepository>,
    players: Arc<dyn PlayerRepository>,
}

impl ScorerByName {
    pub fn new(clubs: Arc<dyn ClubRepository>, players: Arc<dyn PlayerRepository>) -> Self {
        Self { clubs, players }
    }
}

#[async_trait]
impl EntityResolver<ScorerEntry> for ScorerByName {
    type Entity = Player;
    type Anchor = Club;

    async fn resolve(&self, scorer: &ScorerEntry) -> Result<Resolution<Player, Club>> {
        let Some(club) = self.clubs.find_by_external_id(scorer.team.id).await? else {
            return Ok(Resolution::Gap(format!(
                "club with external id {} not found for {}",
                scorer.team.id, scorer.player.name
            )));
        };

        let name = &scorer.player.name;
        let mut all = self.players.find_all().await?;
        let existing = all
            .iter()
            .position(|p| &p.name == name)
            .or_else(|| {
                let lowered = name.to_lowercase();
                all.iter()
                    .position(|p| p.belongs_to(&club.id) && p.name.to_lowercase() == lowered)
            });

        Ok(match existing {
            Some(i) => Resolution::Existing {
                entity: all.swap_remove(i),
                anchor: club,
            },
            None => Resolution::New { anchor: club },
        })
    }
}

impl SyncService {
    /// Reconcile top-scorer statistics into players
    pub(super) async fn sync_scorers(&self) -> Result<FeedSyncStats> {
        let payload = self.feed.scorers().await?;
        let mut stats = FeedSyncStats::default();

        for record in &payload.scorers {
            match record {
                FeedRecord::Valid(scorer) => match self.upsert_scorer(scorer).await {
                    Ok(applied) => stats.record(applied),
                    Err(e) => {
                        error!(player = %scorer.player.name, error = %e, "Failed to store scorer");
                        stats.failed += 1;
                    }
                },
                FeedRecord::Malformed(reason) => {
                    error!(feed = "scorers", reason = %reason, "Skipping malformed scorer");
                    stats.malformed += 1;
                }
            }
        }

        info!(
            feed = "scorers",
            players = stats.touched(),
            created = stats.created,
            updated = stats.updated,
            skipped = stats.skipped,
            "Top scorers synced"
        );
        Ok(stats)
    }

    async fn upsert_scorer(&self, scorer: &ScorerEntry) -> Result<Applied> {
        let now = self.clock.now_millis();
        let name = &scorer.player.name;
        let (mut player, applied) = match self.resolvers.scorers.resolve(scorer).await? {
            Resolution::Existing { entity, .. } => (entity, Applied::Updated),
            Resolution::New { anchor: club } => {
                info!(player = %name, club = %club.name, "Creating player from scorers");
                (
                    Player::new(self.ids.generate_id(), name.clone(), Some(club.id), now),
                    Applied::Created,
                )
            }
            Resolution::Gap(reason) => {
                warn!(player = %name, reason = %reason, "Scorer dropped");
                return Ok(Applied::Skipped);
            }
        };

        player.nationality = scorer.player.nationality.clone();
        player.jersey_number = scorer.player.shirt_number;
        if let Some(section) = &scorer.player.section {
            player.position = position_from_section(section);
        }
        if let Some(dob) = parse_birth_date(scorer.player.date_of_birth.as_deref(), name) {
            player.date_of_birth = Some(dob);
        }
        player.goals = scorer.goals.unwrap_or(0);
        player.assists = scorer.assists.unwrap_or(0);
        player.matches_played = scorer.played_matches.unwrap_or(0);
        player.updated_at = now;

        match applied {
            Applied::Created => self.players.insert(&player).await?,
            _ => self.players.update(&player).await?,
        }
        debug!(
            player = %name,
            goals = player.goals,
            assists = player.assists,
            matches = player.matches_played,
            "Updated scorer stats"
        );
        Ok(applied)
    }
}
