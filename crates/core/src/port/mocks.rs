// ============================================================================
// Mock Implementations for Testing
// ============================================================================
//
// In-memory store implementing every repository port, a scripted feed, and
// deterministic id/time providers. Used by unit tests here and by the
// integration-tests crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::feed::{
    FeedError, FootballFeed, MatchesPayload, ScorersPayload, StandingsPayload, TeamPayload,
};
use super::{
    ClubRepository, IdProvider, MatchRepository, PlayerRepository, PredictionRepository,
    Repositories, TimeProvider,
};
use crate::domain::{Club, ClubId, Match, MatchId, MatchStatus, Player, PlayerId, Prediction};
use crate::error::{AppError, Result};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory store with the same cascade rules as the SQLite schema
///
/// club -> players, club -> matches, match -> prediction.
#[derive(Default)]
pub struct InMemoryStore {
    clubs: Mutex<Vec<Club>>,
    players: Mutex<Vec<Player>>,
    matches: Mutex<Vec<Match>>,
    predictions: Mutex<Vec<Prediction>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// One shared store behind all four repository ports
    pub fn repositories(store: Arc<InMemoryStore>) -> Repositories {
        Repositories {
            clubs: store.clone(),
            players: store.clone(),
            matches: store.clone(),
            predictions: store,
        }
    }

    fn match_by_id(&self, id: &str) -> Option<Match> {
        lock(&self.matches).iter().find(|m| m.id == id).cloned()
    }

    fn remove_predictions_for(&self, match_ids: &[MatchId]) {
        lock(&self.predictions).retain(|p| !match_ids.contains(&p.match_id));
    }
}

#[async_trait]
impl ClubRepository for InMemoryStore {
    async fn insert(&self, club: &Club) -> Result<()> {
        let mut clubs = lock(&self.clubs);
        if clubs.iter().any(|c| c.id == club.id) {
            return Err(AppError::Database(format!("duplicate club id {}", club.id)));
        }
        if clubs.iter().any(|c| c.name == club.name) {
            return Err(AppError::Database(format!("duplicate club name {}", club.name)));
        }
        clubs.push(club.clone());
        Ok(())
    }

    async fn update(&self, club: &Club) -> Result<()> {
        let mut clubs = lock(&self.clubs);
        match clubs.iter_mut().find(|c| c.id == club.id) {
            Some(slot) => {
                *slot = club.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("club {}", club.id))),
        }
    }

    async fn find_by_id(&self, id: &ClubId) -> Result<Option<Club>> {
        Ok(lock(&self.clubs).iter().find(|c| &c.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Club>> {
        Ok(lock(&self.clubs).iter().find(|c| c.name == name).cloned())
    }

    async fn find_by_external_id(&self, external_id: i64) -> Result<Option<Club>> {
        Ok(lock(&self.clubs)
            .iter()
            .find(|c| c.external_id == Some(external_id))
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Club>> {
        let mut clubs = lock(&self.clubs).clone();
        clubs.sort_by(|a, b| {
            (a.position.is_none(), a.position, &a.name).cmp(&(b.position.is_none(), b.position, &b.name))
        });
        Ok(clubs)
    }

    async fn count(&self) -> Result<i64> {
        Ok(lock(&self.clubs).len() as i64)
    }

    async fn delete(&self, id: &ClubId) -> Result<bool> {
        let removed = {
            let mut clubs = lock(&self.clubs);
            let before = clubs.len();
            clubs.retain(|c| &c.id != id);
            clubs.len() != before
        };
        if removed {
            lock(&self.players).retain(|p| !p.belongs_to(id));
            let gone = {
                let mut matches = lock(&self.matches);
                let gone: Vec<MatchId> = matches.iter().filter(|m| m.involves(id)).map(|m| m.id.clone()).collect();
                matches.retain(|m| !m.involves(id));
                gone
            };
            self.remove_predictions_for(&gone);
        }
        Ok(removed)
    }
}

#[async_trait]
impl PlayerRepository for InMemoryStore {
    async fn insert(&self, player: &Player) -> Result<()> {
        lock(&self.players).push(player.clone());
        Ok(())
    }

    async fn update(&self, player: &Player) -> Result<()> {
        let mut players = lock(&self.players);
        match players.iter_mut().find(|p| p.id == player.id) {
            Some(slot) => {
                *slot = player.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("player {}", player.id))),
        }
    }

    async fn find_by_id(&self, id: &PlayerId) -> Result<Option<Player>> {
        Ok(lock(&self.players).iter().find(|p| &p.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Player>> {
        Ok(lock(&self.players).clone())
    }

    async fn find_by_club(&self, club_id: &ClubId) -> Result<Vec<Player>> {
        Ok(lock(&self.players)
            .iter()
            .filter(|p| p.belongs_to(club_id))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        Ok(lock(&self.players).len() as i64)
    }
}

#[async_trait]
impl MatchRepository for InMemoryStore {
    async fn insert(&self, fixture: &Match) -> Result<()> {
        lock(&self.matches).push(fixture.clone());
        Ok(())
    }

    async fn update(&self, fixture: &Match) -> Result<()> {
        let mut matches = lock(&self.matches);
        match matches.iter_mut().find(|m| m.id == fixture.id) {
            Some(slot) => {
                *slot = fixture.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("match {}", fixture.id))),
        }
    }

    async fn find_by_id(&self, id: &MatchId) -> Result<Option<Match>> {
        Ok(self.match_by_id(id))
    }

    async fn find_by_club(&self, club_id: &ClubId) -> Result<Vec<Match>> {
        Ok(lock(&self.matches)
            .iter()
            .filter(|m| m.involves(club_id))
            .cloned()
            .collect())
    }

    async fn find_by_status(&self, status: MatchStatus) -> Result<Vec<Match>> {
        let mut found: Vec<Match> = lock(&self.matches)
            .iter()
            .filter(|m| m.status == status)
            .cloned()
            .collect();
        found.sort_by_key(|m| m.match_date);
        Ok(found)
    }

    async fn count(&self) -> Result<i64> {
        Ok(lock(&self.matches).len() as i64)
    }

    async fn delete(&self, id: &MatchId) -> Result<bool> {
        let removed = {
            let mut matches = lock(&self.matches);
            let before = matches.len();
            matches.retain(|m| &m.id != id);
            matches.len() != before
        };
        if removed {
            self.remove_predictions_for(std::slice::from_ref(id));
        }
        Ok(removed)
    }
}

#[async_trait]
impl PredictionRepository for InMemoryStore {
    async fn insert(&self, prediction: &Prediction) -> Result<()> {
        lock(&self.predictions).push(prediction.clone());
        Ok(())
    }

    async fn find_by_match(&self, match_id: &MatchId) -> Result<Option<Prediction>> {
        Ok(lock(&self.predictions)
            .iter()
            .find(|p| &p.match_id == match_id)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Prediction>> {
        let mut all = lock(&self.predictions).clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn find_by_match_status(&self, status: MatchStatus) -> Result<Vec<Prediction>> {
        let predictions = lock(&self.predictions).clone();
        let mut joined: Vec<(Match, Prediction)> = predictions
            .into_iter()
            .filter_map(|p| self.match_by_id(&p.match_id).map(|m| (m, p)))
            .filter(|(m, _)| m.status == status)
            .collect();
        joined.sort_by_key(|(m, _)| m.match_date);
        Ok(joined.into_iter().map(|(_, p)| p).collect())
    }

    async fn find_by_match_week(&self, match_week: i32) -> Result<Vec<Prediction>> {
        let predictions = lock(&self.predictions).clone();
        Ok(predictions
            .into_iter()
            .filter(|p| {
                self.match_by_id(&p.match_id)
                    .is_some_and(|m| m.match_week == Some(match_week))
            })
            .collect())
    }

    async fn delete_all(&self) -> Result<u64> {
        let mut predictions = lock(&self.predictions);
        let removed = predictions.len() as u64;
        predictions.clear();
        Ok(removed)
    }

    async fn count(&self) -> Result<i64> {
        Ok(lock(&self.predictions).len() as i64)
    }
}

/// Feed endpoints, for scripting failures and asserting call order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Standings,
    Matches,
    Scorers,
    Team,
}

/// Scripted behavior of one endpoint
#[derive(Debug, Clone)]
pub enum StubBehavior {
    /// Serve the configured payload
    Serve,
    /// Fail with a transport error
    Fail(String),
    /// Panic inside the call (for panic isolation testing)
    Panic(String),
}

/// Scripted Football Feed
///
/// Unset payloads are served empty; unknown team ids answer HTTP 404.
pub struct StubFeed {
    standings: Mutex<Option<StandingsPayload>>,
    matches: Mutex<Option<MatchesPayload>>,
    scorers: Mutex<Option<ScorersPayload>>,
    teams: Mutex<HashMap<i64, TeamPayload>>,
    behavior: Mutex<HashMap<Endpoint, StubBehavior>>,
    calls: Mutex<Vec<Endpoint>>,
    last_season: AtomicI64,
}

impl Default for StubFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl StubFeed {
    pub fn new() -> Self {
        Self {
            standings: Mutex::new(None),
            matches: Mutex::new(None),
            scorers: Mutex::new(None),
            teams: Mutex::new(HashMap::new()),
            behavior: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            last_season: AtomicI64::new(0),
        }
    }

    /// Decode a payload from JSON the way the HTTP adapter would
    ///
    /// Panics on a shape mismatch; only meant for test fixtures.
    pub fn payload<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).expect("test payload must decode")
    }

    pub fn with_standings(self, payload: StandingsPayload) -> Self {
        *lock(&self.standings) = Some(payload);
        self
    }

    pub fn with_matches(self, payload: MatchesPayload) -> Self {
        *lock(&self.matches) = Some(payload);
        self
    }

    pub fn with_scorers(self, payload: ScorersPayload) -> Self {
        *lock(&self.scorers) = Some(payload);
        self
    }

    pub fn with_team(self, external_id: i64, payload: TeamPayload) -> Self {
        lock(&self.teams).insert(external_id, payload);
        self
    }

    pub fn set_behavior(&self, endpoint: Endpoint, behavior: StubBehavior) {
        lock(&self.behavior).insert(endpoint, behavior);
    }

    pub fn set_standings(&self, payload: StandingsPayload) {
        *lock(&self.standings) = Some(payload);
    }

    pub fn set_matches(&self, payload: MatchesPayload) {
        *lock(&self.matches) = Some(payload);
    }

    pub fn set_scorers(&self, payload: ScorersPayload) {
        *lock(&self.scorers) = Some(payload);
    }

    /// Endpoints called so far, in order
    pub fn calls(&self) -> Vec<Endpoint> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        lock(&self.calls).iter().filter(|e| **e == endpoint).count()
    }

    /// Season year passed to the last fixtures call
    pub fn last_season(&self) -> i64 {
        self.last_season.load(Ordering::SeqCst)
    }

    fn enter(&self, endpoint: Endpoint) -> std::result::Result<(), FeedError> {
        lock(&self.calls).push(endpoint);
        let behavior = lock(&self.behavior)
            .get(&endpoint)
            .cloned()
            .unwrap_or(StubBehavior::Serve);
        match behavior {
            StubBehavior::Serve => Ok(()),
            StubBehavior::Fail(msg) => Err(FeedError::Transport(msg)),
            StubBehavior::Panic(msg) => panic!("{}", msg),
        }
    }
}

#[async_trait]
impl FootballFeed for StubFeed {
    async fn standings(&self) -> std::result::Result<StandingsPayload, FeedError> {
        self.enter(Endpoint::Standings)?;
        Ok(lock(&self.standings)
            .clone()
            .unwrap_or(StandingsPayload { standings: Vec::new() }))
    }

    async fn matches(&self, season: i32) -> std::result::Result<MatchesPayload, FeedError> {
        self.enter(Endpoint::Matches)?;
        self.last_season.store(season as i64, Ordering::SeqCst);
        Ok(lock(&self.matches)
            .clone()
            .unwrap_or(MatchesPayload { matches: Vec::new() }))
    }

    async fn scorers(&self) -> std::result::Result<ScorersPayload, FeedError> {
        self.enter(Endpoint::Scorers)?;
        Ok(lock(&self.scorers)
            .clone()
            .unwrap_or(ScorersPayload { scorers: Vec::new() }))
    }

    async fn team(&self, external_id: i64) -> std::result::Result<TeamPayload, FeedError> {
        self.enter(Endpoint::Team)?;
        lock(&self.teams)
            .get(&external_id)
            .cloned()
            .ok_or_else(|| FeedError::Status {
                code: 404,
                url: format!("/teams/{}", external_id),
            })
    }
}

/// Sequential ids: "id-1", "id-2", ...
#[derive(Default)]
pub struct SequentialIdProvider {
    next: AtomicU64,
}

impl SequentialIdProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdProvider for SequentialIdProvider {
    fn generate_id(&self) -> String {
        format!("id-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Settable clock
pub struct FixedTimeProvider {
    now: AtomicI64,
}

impl FixedTimeProvider {
    pub fn new(now_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(now_millis),
        }
    }

    pub fn set(&self, now_millis: i64) {
        self.now.store(now_millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_rejects_duplicate_club_name() {
        let store = InMemoryStore::new();
        ClubRepository::insert(&store, &Club::new("c1", "Arsenal FC", 1_000)).await.unwrap();

        let err = ClubRepository::insert(&store, &Club::new("c2", "Arsenal FC", 1_000))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(ClubRepository::count(&store).await.unwrap(), 1);
    }
}
