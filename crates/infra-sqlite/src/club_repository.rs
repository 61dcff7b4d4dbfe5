// SQLite ClubRepository Implementation

use async_trait::async_trait;
use matchday_core::domain::{Club, ClubId};
use matchday_core::error::Result;
use matchday_core::port::ClubRepository;
use sqlx::SqlitePool;

use crate::error::map_sqlx_error;

pub struct SqliteClubRepository {
    pool: SqlitePool,
}

impl SqliteClubRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClubRepository for SqliteClubRepository {
    async fn insert(&self, club: &Club) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO clubs (
                id, name, external_id, short_name, tla, crest_url, logo_url,
                stadium, manager, founded_year,
                position, played_games, won, draw, lost, points,
                goals_for, goals_against, goal_difference,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&club.id)
        .bind(&club.name)
        .bind(club.external_id)
        .bind(&club.short_name)
        .bind(&club.tla)
        .bind(&club.crest_url)
        .bind(&club.logo_url)
        .bind(&club.stadium)
        .bind(&club.manager)
        .bind(club.founded_year)
        .bind(club.position)
        .bind(club.played_games)
        .bind(club.won)
        .bind(club.draw)
        .bind(club.lost)
        .bind(club.points)
        .bind(club.goals_for)
        .bind(club.goals_against)
        .bind(club.goal_difference)
        .bind(club.created_at)
        .bind(club.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update(&self, club: &Club) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE clubs
            SET name = ?, external_id = ?, short_name = ?, tla = ?, crest_url = ?, logo_url = ?,
                stadium = ?, manager = ?, founded_year = ?,
                position = ?, played_games = ?, won = ?, draw = ?, lost = ?, points = ?,
                goals_for = ?, goals_against = ?, goal_difference = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&club.name)
        .bind(club.external_id)
        .bind(&club.short_name)
        .bind(&club.tla)
        .bind(&club.crest_url)
        .bind(&club.logo_url)
        .bind(&club.stadium)
        .bind(&club.manager)
        .bind(club.founded_year)
        .bind(club.position)
        .bind(club.played_games)
        .bind(club.won)
        .bind(club.draw)
        .bind(club.lost)
        .bind(club.points)
        .bind(club.goals_for)
        .bind(club.goals_against)
        .bind(club.goal_difference)
        .bind(club.updated_at)
        .bind(&club.id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ClubId) -> Result<Option<Club>> {
        let row = sqlx::query_as::<_, ClubRow>("SELECT * FROM clubs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(ClubRow::into_club))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Club>> {
        // SQLite '=' on TEXT is case-sensitive (BINARY collation)
        let row = sqlx::query_as::<_, ClubRow>(
            "SELECT * FROM clubs WHERE name = ? ORDER BY created_at ASC LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ClubRow::into_club))
    }

    async fn find_by_external_id(&self, external_id: i64) -> Result<Option<Club>> {
        let row = sqlx::query_as::<_, ClubRow>(
            "SELECT * FROM clubs WHERE external_id = ? ORDER BY created_at ASC LIMIT 1",
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ClubRow::into_club))
    }

    async fn find_all(&self) -> Result<Vec<Club>> {
        let rows: Vec<ClubRow> = sqlx::query_as(
            "SELECT * FROM clubs ORDER BY position IS NULL, position ASC, name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ClubRow::into_club).collect())
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM clubs")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn delete(&self, id: &ClubId) -> Result<bool> {
        // Players and matches (and through matches, predictions) cascade
        let result = sqlx::query("DELETE FROM clubs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct ClubRow {
    id: String,
    name: String,
    external_id: Option<i64>,
    short_name: Option<String>,
    tla: Option<String>,
    crest_url: Option<String>,
    logo_url: Option<String>,
    stadium: Option<String>,
    manager: Option<String>,
    founded_year: Option<i32>,
    position: Option<i32>,
    played_games: Option<i32>,
    won: Option<i32>,
    draw: Option<i32>,
    lost: Option<i32>,
    points: Option<i32>,
    goals_for: Option<i32>,
    goals_against: Option<i32>,
    goal_difference: Option<i32>,
    created_at: i64,
    updated_at: i64,
}

impl ClubRow {
    fn into_club(self) -> Club {
        Club {
            id: self.id,
            name: self.name,
            external_id: self.external_id,
            short_name: self.short_name,
            tla: self.tla,
            crest_url: self.crest_url,
            logo_url: self.logo_url,
            stadium: self.stadium,
            manager: self.manager,
            founded_year: self.founded_year,
            position: self.position,
            played_games: self.played_games,
            won: self.won,
            draw: self.draw,
            lost: self.lost,
            points: self.points,
            goals_for: self.goals_for,
            goals_against: self.goals_against,
            goal_difference: self.goal_difference,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
