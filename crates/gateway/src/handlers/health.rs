//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub checks: ReadyChecks,
}

#[derive(Serialize)]
pub struct ReadyChecks {
    pub records: usize,
    pub remote_enabled: bool,
    pub remote_cached: usize,
    pub active_graph: bool,
}

/// Liveness probe - always returns healthy if server is running
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Readiness probe - an empty store still serves, but reports no data
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    let checks = ReadyChecks {
        records: state.store.len(),
        remote_enabled: state.remote.is_some(),
        remote_cached: state.remote_cache.len().await,
        active_graph: state.current_graph.read().await.is_some(),
    };

    Json(ReadyResponse {
        status: if checks.records > 0 { "ready" } else { "no_data" }.to_string(),
        checks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{get_json, state_with};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(state_with(vec![]), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_reports_empty_store() {
        let (status, body) = get_json(state_with(vec![]), "/api/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "no_data");
        assert_eq!(body["checks"]["records"], 0);
        assert_eq!(body["checks"]["active_graph"], false);
    }
}
