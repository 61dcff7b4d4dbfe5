// Squad feed -> Player (one club at a time)

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::mapping::parse_birth_date;
use super::report::{Applied, FeedSyncStats};
use super::resolver::{EntityResolver, Resolution};
use super::SyncService;
use crate::domain::{Club, Player, PlayerPosition};
use crate::error::Result;
use crate::port::{FeedRecord, PlayerRepository, SquadMember};

/// A squad member together with the club whose roster is being fetched
#[derive(Debug, Clone)]
pub struct SquadEntry {
    pub club: Club,
    pub member: SquadMember,
}

/// Player by case-insensitive name, only among the target club's players
///
/// The anchor is the member's validated name.
pub struct SquadMemberByName {
    players: Arc<dyn PlayerRepository>,
}

impl SquadMemberByName {
    pub fn new(players: Arc<dyn PlayerRepository>) -> Self {
        Self { players }
    }
}

#[async_trait]
impl EntityResolver<SquadEntry> for SquadMemberByName {
    type Entity = Player;
    type Anchor = String;

    async fn resolve(&self, entry: &SquadEntry) -> Result<Resolution<Player, String>> {
        let name = match entry.member.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Ok(Resolution::Gap("squad member without a name".to_string())),
        };

        let lowered = name.to_lowercase();
        let existing = self
            .players
            .find_by_club(&entry.club.id)
            .await?
            .into_iter()
            .find(|p| p.name.to_lowercase() == lowered);

        Ok(match existing {
            Some(entity) => Resolution::Existing { entity, anchor: name },
            None => Resolution::New { anchor: name },
        })
    }
}

impl SyncService {
    /// Fetch one team document and reconcile that club's players
    ///
    /// Unlike the three scheduled steps, a feed failure here is returned to
    /// the caller.
    pub async fn refresh_squad(&self, external_id: i64, club: &Club) -> Result<FeedSyncStats> {
        let payload = self.feed.team(external_id).await?;
        let mut stats = FeedSyncStats::default();

        for record in payload.squad {
            match record {
                FeedRecord::Valid(member) => {
                    let entry = SquadEntry {
                        club: club.clone(),
                        member,
                    };
                    match self.upsert_squad_member(&entry).await {
                        Ok(applied) => stats.record(applied),
                        Err(e) => {
                            error!(club = %club.name, error = %e, "Failed to store squad member");
                            stats.failed += 1;
                        }
                    }
                }
                FeedRecord::Malformed(reason) => {
                    error!(feed = "squad", club = %club.name, reason = %reason, "Skipping malformed squad member");
                    stats.malformed += 1;
                }
            }
        }

        info!(
            feed = "squad",
            club = %club.name,
            players = stats.touched(),
            created = stats.created,
            updated = stats.updated,
            "Squad synced"
        );
        Ok(stats)
    }

    async fn upsert_squad_member(&self, entry: &SquadEntry) -> Result<Applied> {
        let now = self.clock.now_millis();
        let (mut player, name, applied) = match self.resolvers.squad.resolve(entry).await? {
            Resolution::Existing { entity, anchor } => (entity, anchor, Applied::Updated),
            Resolution::New { anchor } => {
                let player = Player::new(
                    self.ids.generate_id(),
                    anchor.clone(),
                    Some(entry.club.id.clone()),
                    now,
                );
                (player, anchor, Applied::Created)
            }
            Resolution::Gap(reason) => {
                warn!(club = %entry.club.name, reason = %reason, "Squad member dropped");
                return Ok(Applied::Skipped);
            }
        };

        let member = &entry.member;
        // Stored verbatim, unlike the scorers section
        player.position = member
            .position
            .clone()
            .unwrap_or_else(|| PlayerPosition::Unknown.as_str().to_string());
        player.nationality = member.nationality.clone();
        player.jersey_number = member.shirt_number;
        if let Some(dob) = parse_birth_date(member.date_of_birth.as_deref(), &name) {
            player.date_of_birth = Some(dob);
        }
        player.updated_at = now;

        match applied {
            Applied::Created => self.players.insert(&player).await?,
            _ => self.players.update(&player).await?,
        }
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::error::AppError;
    use crate::port::mocks::StubFeed;
    use crate::port::{ClubRepository, PlayerRepository, TeamPayload};
    use chrono::NaiveDate;
    use serde_json::json;

    fn squad(items: serde_json::Value) -> TeamPayload {
        StubFeed::payload(json!({ "squad": items }))
    }

    #[tokio::test]
    async fn test_squad_upserts_within_club() {
        let h = harness(
            StubFeed::new().with_standings(three_club_table()).with_team(
                57,
                squad(json!([
                    { "id": 1, "name": "David Raya", "position": "Goalkeeper", "dateOfBirth": "1995-09-15", "nationality": "Spain", "shirtNumber": 22 },
                    { "id": 2, "name": "Declan Rice", "position": "Central Midfield" },
                    { "id": 3, "name": "" },
                    { "id": 4, "name": "Kai Havertz", "dateOfBirth": "June 1999" }
                ])),
            ),
        );
        h.service.sync_standings().await.unwrap();
        let arsenal = h.store.find_by_name("Arsenal FC").await.unwrap().unwrap();

        let stats = h.service.refresh_squad(57, &arsenal).await.unwrap();
        assert_eq!(stats.created, 3);
        assert_eq!(stats.skipped, 1);

        let players = h.store.find_by_club(&arsenal.id).await.unwrap();
        let raya = players.iter().find(|p| p.name == "David Raya").unwrap();
        assert_eq!(raya.date_of_birth, NaiveDate::from_ymd_opt(1995, 9, 15));
        assert_eq!(raya.jersey_number, Some(22));
        assert_eq!(raya.goals, 0);

        // Position kept verbatim; missing position is "Unknown"
        let rice = players.iter().find(|p| p.name == "Declan Rice").unwrap();
        assert_eq!(rice.position, "Central Midfield");
        let havertz = players.iter().find(|p| p.name == "Kai Havertz").unwrap();
        assert_eq!(havertz.position, "Unknown");
        assert_eq!(havertz.date_of_birth, None);

        // Second fetch updates the same rows
        let again = h.service.refresh_squad(57, &arsenal).await.unwrap();
        assert_eq!((again.created, again.updated), (0, 3));
        assert_eq!(PlayerRepository::count(h.store.as_ref()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_squad_feed_error_is_returned() {
        let h = harness(StubFeed::new().with_standings(three_club_table()));
        h.service.sync_standings().await.unwrap();
        let chelsea = h.store.find_by_name("Chelsea FC").await.unwrap().unwrap();

        let err = h.service.refresh_squad(61, &chelsea).await.unwrap_err();
        assert!(matches!(err, AppError::Feed(_)));
    }
}
