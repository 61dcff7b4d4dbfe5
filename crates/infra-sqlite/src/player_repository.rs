// SQLite PlayerRepository Implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use matchday_core::domain::{ClubId, Player, PlayerId};
use matchday_core::error::Result;
use matchday_core::port::PlayerRepository;
use sqlx::SqlitePool;

use crate::error::map_sqlx_error;

pub struct SqlitePlayerRepository {
    pool: SqlitePool,
}

impl SqlitePlayerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerRepository for SqlitePlayerRepository {
    async fn insert(&self, player: &Player) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO players (
                id, name, club_id, jersey_number, position, nationality, date_of_birth,
                height, weight, market_value, photo_url,
                goals, assists, yellow_cards, red_cards, matches_played, minutes_played,
                clean_sheets, saves, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&player.id)
        .bind(&player.name)
        .bind(&player.club_id)
        .bind(player.jersey_number)
        .bind(&player.position)
        .bind(&player.nationality)
        .bind(player.date_of_birth)
        .bind(player.height)
        .bind(player.weight)
        .bind(player.market_value)
        .bind(&player.photo_url)
        .bind(player.goals)
        .bind(player.assists)
        .bind(player.yellow_cards)
        .bind(player.red_cards)
        .bind(player.matches_played)
        .bind(player.minutes_played)
        .bind(player.clean_sheets)
        .bind(player.saves)
        .bind(player.created_at)
        .bind(player.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update(&self, player: &Player) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE players
            SET name = ?, club_id = ?, jersey_number = ?, position = ?, nationality = ?,
                date_of_birth = ?, height = ?, weight = ?, market_value = ?, photo_url = ?,
                goals = ?, assists = ?, yellow_cards = ?, red_cards = ?,
                matches_played = ?, minutes_played = ?, clean_sheets = ?, saves = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&player.name)
        .bind(&player.club_id)
        .bind(player.jersey_number)
        .bind(&player.position)
        .bind(&player.nationality)
        .bind(player.date_of_birth)
        .bind(player.height)
        .bind(player.weight)
        .bind(player.market_value)
        .bind(&player.photo_url)
        .bind(player.goals)
        .bind(player.assists)
        .bind(player.yellow_cards)
        .bind(player.red_cards)
        .bind(player.matches_played)
        .bind(player.minutes_played)
        .bind(player.clean_sheets)
        .bind(player.saves)
        .bind(player.updated_at)
        .bind(&player.id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &PlayerId) -> Result<Option<Player>> {
        let row = sqlx::query_as::<_, PlayerRow>("SELECT * FROM players WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PlayerRow::into_player))
    }

    async fn find_all(&self) -> Result<Vec<Player>> {
        let rows: Vec<PlayerRow> =
            sqlx::query_as("SELECT * FROM players ORDER BY created_at ASC, rowid ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PlayerRow::into_player).collect())
    }

    async fn find_by_club(&self, club_id: &ClubId) -> Result<Vec<Player>> {
        let rows: Vec<PlayerRow> = sqlx::query_as(
            "SELECT * FROM players WHERE club_id = ? ORDER BY created_at ASC, rowid ASC",
        )
        .bind(club_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PlayerRow::into_player).collect())
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM players")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct PlayerRow {
    id: String,
    name: String,
    club_id: Option<String>,
    jersey_number: Option<i32>,
    position: String,
    nationality: Option<String>,
    date_of_birth: Option<NaiveDate>,
    height: Option<f64>,
    weight: Option<f64>,
    market_value: Option<f64>,
    photo_url: Option<String>,
    goals: i32,
    assists: i32,
    yellow_cards: i32,
    red_cards: i32,
    matches_played: i32,
    minutes_played: i32,
    clean_sheets: i32,
    saves: i32,
    created_at: i64,
    updated_at: i64,
}

impl PlayerRow {
    fn into_player(self) -> Player {
        Player {
            id: self.id,
            name: self.name,
            club_id: self.club_id,
            jersey_number: self.jersey_number,
            position: self.position,
            nationality: self.nationality,
            date_of_birth: self.date_of_birth,
            height: self.height,
            weight: self.weight,
            market_value: self.market_value,
            photo_url: self.photo_url,
            goals: self.goals,
            assists: self.assists,
            yellow_cards: self.yellow_cards,
            red_cards: self.red_cards,
            matches_played: self.matches_played,
            minutes_played: self.minutes_played,
            clean_sheets: self.clean_sheets,
            saves: self.saves,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
