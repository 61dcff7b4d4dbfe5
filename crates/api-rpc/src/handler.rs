//! RPC Method Handlers
//!
//! Thin mapping between JSON-RPC parameters and the `Operations` facade.

use crate::error::to_rpc_error;
use crate::types::{
    BatchResponse, ClearResponse, ListPredictionsRequest, ListPredictionsResponse,
    RefreshResponse, SquadRequest, SquadResponse, SquadsResponse, StatsResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use matchday_core::application::{BatchReport, Operations};
use std::time::Instant;
use tracing::info;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    operations: Operations,
    start_time: Instant,
}

impl RpcHandler {
    pub fn new(operations: Operations) -> Self {
        Self {
            operations,
            start_time: Instant::now(),
        }
    }

    /// data.refresh.v1
    pub async fn refresh(&self) -> Result<RefreshResponse, ErrorObjectOwned> {
        info!("On-demand full sync requested");
        let report = self.operations.refresh_all().await.map_err(to_rpc_error)?;

        let failed_steps: Vec<String> = report.failed_steps().into_iter().map(String::from).collect();
        let message = if failed_steps.is_empty() {
            "Data refreshed successfully".to_string()
        } else {
            format!("Data refreshed; failed steps: {}", failed_steps.join(", "))
        };

        Ok(RefreshResponse {
            message,
            failed_steps,
            report,
        })
    }

    /// data.squad.v1
    pub async fn squad(&self, params: SquadRequest) -> Result<SquadResponse, ErrorObjectOwned> {
        let stats = self
            .operations
            .refresh_squad(params.external_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(SquadResponse {
            message: format!(
                "Squad fetched for team {}: {} players",
                params.external_id,
                stats.touched()
            ),
            external_id: params.external_id,
            stats,
        })
    }

    /// data.squads.v1
    pub async fn squads(&self) -> Result<SquadsResponse, ErrorObjectOwned> {
        let clubs_processed = self
            .operations
            .refresh_all_squads()
            .await
            .map_err(to_rpc_error)?;

        Ok(SquadsResponse {
            message: format!("Squads fetched for {} clubs", clubs_processed),
            clubs_processed,
        })
    }

    /// predictions.generate.v1
    pub async fn generate(&self) -> Result<BatchResponse, ErrorObjectOwned> {
        let report = self
            .operations
            .generate_predictions()
            .await
            .map_err(to_rpc_error)?;
        Ok(batch_response("Predictions generated", report))
    }

    /// predictions.clear.v1
    pub async fn clear(&self) -> Result<ClearResponse, ErrorObjectOwned> {
        let removed = self
            .operations
            .clear_predictions()
            .await
            .map_err(to_rpc_error)?;

        Ok(ClearResponse {
            message: format!("Cleared {} predictions", removed),
            removed,
        })
    }

    /// predictions.regenerate.v1
    pub async fn regenerate(&self) -> Result<BatchResponse, ErrorObjectOwned> {
        let report = self
            .operations
            .regenerate_predictions()
            .await
            .map_err(to_rpc_error)?;
        Ok(batch_response("Predictions regenerated", report))
    }

    /// predictions.list.v1
    pub async fn list(
        &self,
        params: ListPredictionsRequest,
    ) -> Result<ListPredictionsResponse, ErrorObjectOwned> {
        let filter = params.filter().map_err(to_rpc_error)?;
        let predictions = self
            .operations
            .predictions(filter)
            .await
            .map_err(to_rpc_error)?;
        Ok(ListPredictionsResponse { predictions })
    }

    /// admin.stats.v1
    pub async fn stats(&self) -> Result<StatsResponse, ErrorObjectOwned> {
        let stats = self.operations.stats().await.map_err(to_rpc_error)?;

        Ok(StatsResponse {
            clubs: stats.clubs,
            players: stats.players,
            matches: stats.matches,
            predictions: stats.predictions,
            syncing: self.operations.is_syncing(),
            last_sync: stats.last_sync,
            uptime_seconds: self.start_time.elapsed().as_secs(),
        })
    }
}

fn batch_response(verb: &str, report: BatchReport) -> BatchResponse {
    let message = if report.failed > 0 {
        format!("{}: {} created, {} failed", verb, report.created, report.failed)
    } else {
        format!("{}: {} created", verb, report.created)
    };
    BatchResponse { message, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code;
    use matchday_core::application::{PredictionService, SyncService};
    use matchday_core::port::mocks::{FixedTimeProvider, InMemoryStore, SequentialIdProvider, StubFeed};
    use serde_json::json;
    use std::sync::Arc;

    fn handler(feed: StubFeed) -> RpcHandler {
        let repos = InMemoryStore::repositories(Arc::new(InMemoryStore::new()));
        let ids = Arc::new(SequentialIdProvider::new());
        let clock = Arc::new(FixedTimeProvider::new(1_792_411_200_000));
        let sync = SyncService::new(Arc::new(feed), &repos, ids.clone(), clock.clone());
        let predictions = PredictionService::new(&repos, ids, clock);
        RpcHandler::new(Operations::new(sync, predictions, repos))
    }

    fn standings() -> serde_json::Value {
        json!({ "standings": [{ "type": "TOTAL", "table": [
            { "position": 1, "team": { "id": 64, "name": "Liverpool FC" }, "playedGames": 8, "won": 7, "draw": 0, "lost": 1,
              "points": 21, "goalsFor": 18, "goalsAgainst": 6, "goalDifference": 12 },
            { "position": 20, "team": { "id": 328, "name": "Burnley FC" }, "playedGames": 8, "won": 0, "draw": 2, "lost": 6,
              "points": 2, "goalsFor": 4, "goalsAgainst": 17, "goalDifference": -13 }
        ]}]})
    }

    #[tokio::test]
    async fn test_refresh_then_predict_flow() {
        let h = handler(
            StubFeed::new()
                .with_standings(StubFeed::payload(standings()))
                .with_matches(StubFeed::payload(json!({ "matches": [
                    { "id": 1, "utcDate": "2026-10-25T15:00:00Z", "status": "TIMED", "matchday": 10,
                      "homeTeam": { "name": "Liverpool FC" }, "awayTeam": { "name": "Burnley FC" } }
                ]}))),
        );

        let refreshed = h.refresh().await.unwrap();
        assert_eq!(refreshed.message, "Data refreshed successfully");

        let generated = h.generate().await.unwrap();
        assert_eq!(generated.report.created, 1);
        assert_eq!(generated.message, "Predictions generated: 1 created");

        let week = h
            .list(ListPredictionsRequest {
                scope: Some("week".into()),
                week: Some(10),
            })
            .await
            .unwrap();
        assert_eq!(week.predictions.len(), 1);

        let stats = h.stats().await.unwrap();
        assert_eq!((stats.clubs, stats.matches, stats.predictions), (2, 1, 1));
        assert!(stats.last_sync.is_some());

        let cleared = h.clear().await.unwrap();
        assert_eq!(cleared.removed, 1);
    }

    #[tokio::test]
    async fn test_unknown_squad_is_not_found_error() {
        let h = handler(StubFeed::new());
        let err = h.squad(SquadRequest { external_id: 57 }).await.unwrap_err();
        assert_eq!(err.code(), code::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_list_scope_is_validation_error() {
        let h = handler(StubFeed::new());
        let err = h
            .list(ListPredictionsRequest {
                scope: Some("week".into()),
                week: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::VALIDATION_ERROR);
    }
}
