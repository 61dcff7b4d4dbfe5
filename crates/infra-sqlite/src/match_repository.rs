// SQLite MatchRepository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use matchday_core::domain::{ClubId, Match, MatchId, MatchStatistics, MatchStatus};
use matchday_core::error::{AppError, Result};
use matchday_core::port::MatchRepository;
use sqlx::SqlitePool;

use crate::error::map_sqlx_error;

pub struct SqliteMatchRepository {
    pool: SqlitePool,
}

impl SqliteMatchRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchRepository for SqliteMatchRepository {
    async fn insert(&self, fixture: &Match) -> Result<()> {
        let statistics = serde_json::to_string(&fixture.statistics)?;

        sqlx::query(
            r#"
            INSERT INTO matches (
                id, home_club_id, away_club_id, match_date, home_score, away_score,
                venue, referee, attendance, match_week, season, status, statistics,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fixture.id)
        .bind(&fixture.home_club_id)
        .bind(&fixture.away_club_id)
        .bind(fixture.match_date.timestamp_millis())
        .bind(fixture.home_score)
        .bind(fixture.away_score)
        .bind(&fixture.venue)
        .bind(&fixture.referee)
        .bind(fixture.attendance)
        .bind(fixture.match_week)
        .bind(&fixture.season)
        .bind(fixture.status.to_string())
        .bind(&statistics)
        .bind(fixture.created_at)
        .bind(fixture.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update(&self, fixture: &Match) -> Result<()> {
        let statistics = serde_json::to_string(&fixture.statistics)?;

        sqlx::query(
            r#"
            UPDATE matches
            SET home_club_id = ?, away_club_id = ?, match_date = ?, home_score = ?, away_score = ?,
                venue = ?, referee = ?, attendance = ?, match_week = ?, season = ?,
                status = ?, statistics = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&fixture.home_club_id)
        .bind(&fixture.away_club_id)
        .bind(fixture.match_date.timestamp_millis())
        .bind(fixture.home_score)
        .bind(fixture.away_score)
        .bind(&fixture.venue)
        .bind(&fixture.referee)
        .bind(fixture.attendance)
        .bind(fixture.match_week)
        .bind(&fixture.season)
        .bind(fixture.status.to_string())
        .bind(&statistics)
        .bind(fixture.updated_at)
        .bind(&fixture.id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &MatchId) -> Result<Option<Match>> {
        let row = sqlx::query_as::<_, MatchRow>("SELECT * FROM matches WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(MatchRow::try_into_match).transpose()
    }

    async fn find_by_club(&self, club_id: &ClubId) -> Result<Vec<Match>> {
        let rows: Vec<MatchRow> = sqlx::query_as(
            r#"
            SELECT * FROM matches
            WHERE home_club_id = ? OR away_club_id = ?
            ORDER BY match_date ASC
            "#,
        )
        .bind(club_id)
        .bind(club_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(MatchRow::try_into_match).collect()
    }

    async fn find_by_status(&self, status: MatchStatus) -> Result<Vec<Match>> {
        let rows: Vec<MatchRow> =
            sqlx::query_as("SELECT * FROM matches WHERE status = ? ORDER BY match_date ASC")
                .bind(status.to_string())
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        rows.into_iter().map(MatchRow::try_into_match).collect()
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM matches")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn delete(&self, id: &MatchId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM matches WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct MatchRow {
    id: String,
    home_club_id: String,
    away_club_id: String,
    match_date: i64, // epoch ms
    home_score: Option<i32>,
    away_score: Option<i32>,
    venue: Option<String>,
    referee: Option<String>,
    attendance: Option<i32>,
    match_week: Option<i32>,
    season: Option<String>,
    status: String,
    statistics: String, // JSON
    created_at: i64,
    updated_at: i64,
}

impl MatchRow {
    fn try_into_match(self) -> Result<Match> {
        let match_date = DateTime::<Utc>::from_timestamp_millis(self.match_date).ok_or_else(|| {
            AppError::Database(format!("match {} has an invalid date {}", self.id, self.match_date))
        })?;
        let statistics: MatchStatistics = serde_json::from_str(&self.statistics)?;

        Ok(Match {
            status: MatchStatus::parse(&self.status)?,
            id: self.id,
            home_club_id: self.home_club_id,
            away_club_id: self.away_club_id,
            match_date,
            home_score: self.home_score,
            away_score: self.away_score,
            venue: self.venue,
            referee: self.referee,
            attendance: self.attendance,
            match_week: self.match_week,
            season: self.season,
            statistics,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
