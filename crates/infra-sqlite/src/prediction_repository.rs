// SQLite PredictionRepository Implementation

use async_trait::async_trait;
use matchday_core::domain::{MatchId, MatchStatus, Outcome, Prediction};
use matchday_core::error::Result;
use matchday_core::port::PredictionRepository;
use sqlx::SqlitePool;

use crate::error::map_sqlx_error;

pub struct SqlitePredictionRepository {
    pool: SqlitePool,
}

impl SqlitePredictionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PredictionRepository for SqlitePredictionRepository {
    async fn insert(&self, prediction: &Prediction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO predictions (
                id, match_id, predicted_home_score, predicted_away_score, outcome,
                home_win_probability, draw_probability, away_win_probability, confidence,
                reasoning, home_form_points, away_form_points, home_position, away_position,
                created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&prediction.id)
        .bind(&prediction.match_id)
        .bind(prediction.predicted_home_score)
        .bind(prediction.predicted_away_score)
        .bind(prediction.outcome.to_string())
        .bind(prediction.home_win_probability)
        .bind(prediction.draw_probability)
        .bind(prediction.away_win_probability)
        .bind(prediction.confidence)
        .bind(&prediction.reasoning)
        .bind(prediction.home_form_points)
        .bind(prediction.away_form_points)
        .bind(prediction.home_position)
        .bind(prediction.away_position)
        .bind(prediction.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_match(&self, match_id: &MatchId) -> Result<Option<Prediction>> {
        let row = sqlx::query_as::<_, PredictionRow>(
            "SELECT * FROM predictions WHERE match_id = ? ORDER BY created_at ASC LIMIT 1",
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(PredictionRow::try_into_prediction).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Prediction>> {
        let rows: Vec<PredictionRow> =
            sqlx::query_as("SELECT * FROM predictions ORDER BY created_at DESC, rowid DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        rows.into_iter().map(PredictionRow::try_into_prediction).collect()
    }

    async fn find_by_match_status(&self, status: MatchStatus) -> Result<Vec<Prediction>> {
        let rows: Vec<PredictionRow> = sqlx::query_as(
            r#"
            SELECT p.* FROM predictions p
            JOIN matches m ON m.id = p.match_id
            WHERE m.status = ?
            ORDER BY m.match_date ASC
            "#,
        )
        .bind(status.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(PredictionRow::try_into_prediction).collect()
    }

    async fn find_by_match_week(&self, match_week: i32) -> Result<Vec<Prediction>> {
        let rows: Vec<PredictionRow> = sqlx::query_as(
            r#"
            SELECT p.* FROM predictions p
            JOIN matches m ON m.id = p.match_id
            WHERE m.match_week = ?
            ORDER BY m.match_date ASC
            "#,
        )
        .bind(match_week)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(PredictionRow::try_into_prediction).collect()
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM predictions")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM predictions")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct PredictionRow {
    id: String,
    match_id: String,
    predicted_home_score: i32,
    predicted_away_score: i32,
    outcome: String,
    home_win_probability: f64,
    draw_probability: f64,
    away_win_probability: f64,
    confidence: f64,
    reasoning: String,
    home_form_points: i32,
    away_form_points: i32,
    home_position: i32,
    away_position: i32,
    created_at: i64,
}

impl PredictionRow {
    fn try_into_prediction(self) -> Result<Prediction> {
        Ok(Prediction {
            outcome: Outcome::parse(&self.outcome)?,
            id: self.id,
            match_id: self.match_id,
            predicted_home_score: self.predicted_home_score,
            predicted_away_score: self.predicted_away_score,
            home_win_probability: self.home_win_probability,
            draw_probability: self.draw_probability,
            away_win_probability: self.away_win_probability,
            confidence: self.confidence,
            reasoning: self.reasoning,
            home_form_points: self.home_form_points,
            away_form_points: self.away_form_points,
            home_position: self.home_position,
            away_position: self.away_position,
            created_at: self.created_at,
        })
    }
}
