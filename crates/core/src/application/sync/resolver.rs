// Entity resolution - mapping feed records onto stored entities
//
// Two of the feeds carry no stable key that matches local data, so matching is
// name based. Each feed gets its own resolver with an explicit rule:
//
// | Feed      | Looks up                       | Rule                                           | On miss |
// |-----------|--------------------------------|------------------------------------------------|---------|
// | standings | Club                           | exact name                                     | create  |
// | fixtures  | Match (home, away clubs)       | clubs by exact name; match by sides + same day | create, or gap if a club is missing |
// | scorers   | Player (club)                  | club by external id; player by exact name, then same-club case-insensitive | create, or gap if the club is unknown |
// | squad     | Player within the target club  | case-insensitive name                          | create, or gap if the member has no name |

use std::sync::Arc;

use async_trait::async_trait;

use super::fixtures::{FixtureBySidesAndDay, FixtureSides};
use super::scorers::ScorerByName;
use super::squad::{SquadEntry, SquadMemberByName};
use super::standings::ClubByName;
use crate::domain::{Club, Match, Player};
use crate::error::Result;
use crate::port::{ClubRepository, FixtureEntry, MatchRepository, PlayerRepository, ScorerEntry, TableEntry};

/// Outcome of resolving one feed record
///
/// `anchor` carries whatever the resolver looked up on the way (the clubs a
/// fixture is between, the club a scorer plays for) so the upsert does not
/// query again.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<E, A> {
    Existing { entity: E, anchor: A },
    New { anchor: A },
    /// No local entity and creation is not permitted
    Gap(String),
}

/// Strategy mapping a feed record `R` to a stored entity
#[async_trait]
pub trait EntityResolver<R: Sync>: Send + Sync {
    type Entity;
    type Anchor;

    async fn resolve(&self, record: &R) -> Result<Resolution<Self::Entity, Self::Anchor>>;
}

pub type ClubResolver = Arc<dyn EntityResolver<TableEntry, Entity = Club, Anchor = ()>>;
pub type FixtureResolver = Arc<dyn EntityResolver<FixtureEntry, Entity = Match, Anchor = FixtureSides>>;
pub type ScorerResolver = Arc<dyn EntityResolver<ScorerEntry, Entity = Player, Anchor = Club>>;
pub type SquadResolver = Arc<dyn EntityResolver<SquadEntry, Entity = Player, Anchor = String>>;

/// One resolver per feed
#[derive(Clone)]
pub struct Resolvers {
    pub standings: ClubResolver,
    pub fixtures: FixtureResolver,
    pub scorers: ScorerResolver,
    pub squad: SquadResolver,
}

impl Resolvers {
    /// The name-keyed rules in the table above
    pub fn name_keyed(
        clubs: Arc<dyn ClubRepository>,
        players: Arc<dyn PlayerRepository>,
        matches: Arc<dyn MatchRepository>,
    ) -> Self {
        Self {
            standings: Arc::new(ClubByName::new(Arc::clone(&clubs))),
            fixtures: Arc::new(FixtureBySidesAndDay::new(Arc::clone(&clubs), matches)),
            scorers: Arc::new(ScorerByName::new(clubs, Arc::clone(&players))),
            squad: Arc::new(SquadMemberByName::new(players)),
        }
    }
}
