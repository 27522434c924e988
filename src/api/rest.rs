// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
//   POST /scan    run a scan over the fixed universe and persist the result
//   GET  /state   full persisted state document
//   GET  /health  liveness + scan counter
//
// No authentication. CORS is configured permissively.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::ApiError;
use crate::app_state::AppState;
use crate::market_data::BarSource;
use crate::scanner::{ScanOutcome, DEFAULT_UNIVERSE_ID};
use crate::types::PersistedState;

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST API router with tracing + CORS middleware and shared state.
pub fn router<S: BarSource + 'static>(state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::<S>))
        .route("/scan", post(scan::<S>))
        .route("/state", get(full_state::<S>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    scans_completed: u64,
    uptime_secs: u64,
    server_time: i64,
}

async fn health<S: BarSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        scans_completed: state.scans_completed(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Scan
// =============================================================================

#[derive(Debug, Deserialize)]
struct ScanRequest {
    /// Scan date; defaults to today (local time).
    #[serde(default)]
    date: Option<NaiveDate>,
    /// Universe id; recorded but the symbol list is fixed.
    #[serde(default)]
    universe: Option<String>,
}

async fn scan<S: BarSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<ScanOutcome>, ApiError> {
    let date = req
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let universe = req.universe.as_deref().unwrap_or(DEFAULT_UNIVERSE_ID);

    let outcome = state.scanner().run_scan(date, universe).await?;
    let total = state.record_scan();

    info!(
        scan_date = %outcome.scan_date,
        qualified = outcome.qualified.len(),
        scans_completed = total,
        "scan served"
    );
    Ok(Json(outcome))
}

// =============================================================================
// Full state document
// =============================================================================

async fn full_state<S: BarSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<PersistedState>, ApiError> {
    Ok(Json(state.store.load()?))
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::market_data::fake::{qualifying_series, FakeBarSource};
    use crate::runtime_config::ScannerConfig;

    fn app(dir: &tempfile::TempDir) -> Router {
        let config = ScannerConfig {
            state_path: dir.path().join("data").join("state.json"),
            ..ScannerConfig::default()
        };
        let source = FakeBarSource::new().with_closes("AAPL", qualifying_series());
        router(Arc::new(AppState::new(config, source)))
    }

    fn post_scan(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/scan")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn scan_returns_qualified_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let resp = app(&dir)
            .oneshot(post_scan(r#"{ "date": "2025-03-14", "universe": "SP500" }"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["scan_date"], "2025-03-14");
        let qualified = body["qualified"].as_array().unwrap();
        assert_eq!(qualified.len(), 1);
        assert_eq!(qualified[0]["ticker"], "AAPL");
        assert_eq!(qualified[0]["price"], 19.0);
        assert_eq!(qualified[0]["rsi"], 45.0);
        assert_eq!(qualified[0]["dma_20"], 20.0);
        assert_eq!(qualified[0]["dma_50"], 18.0);
        assert_eq!(qualified[0]["dma_200"], 18.0);
    }

    #[tokio::test]
    async fn scan_defaults_to_today() {
        let dir = tempfile::tempdir().unwrap();
        let before = chrono::Local::now().date_naive();
        let resp = app(&dir).oneshot(post_scan("{}")).await.unwrap();
        let after = chrono::Local::now().date_naive();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        let scan_date: NaiveDate = body["scan_date"].as_str().unwrap().parse().unwrap();
        assert!(scan_date == before || scan_date == after);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let resp = app(&dir).oneshot(post_scan("{ not json")).await.unwrap();
        assert!(resp.status().is_client_error());

        let resp = app(&dir)
            .oneshot(post_scan(r#"{ "date": "14/03/2025" }"#))
            .await
            .unwrap();
        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn state_reflects_scan_history() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);

        let resp = app.clone().oneshot(get("/state")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["scan_history"].as_array().unwrap().len(), 0);
        assert_eq!(body["portfolio"].as_array().unwrap().len(), 0);
        assert_eq!(body["closed_trades"].as_array().unwrap().len(), 0);

        for date in ["2025-03-13", "2025-03-14"] {
            let resp = app
                .clone()
                .oneshot(post_scan(&format!(r#"{{ "date": "{date}" }}"#)))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let body = json_body(app.clone().oneshot(get("/state")).await.unwrap()).await;
        let history = body["scan_history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["scan_date"], "2025-03-13");
        assert_eq!(history[1]["scan_date"], "2025-03-14");
        assert_eq!(history[1]["qualified_candidates"][0]["ticker"], "AAPL");

        let health = json_body(app.oneshot(get("/health")).await.unwrap()).await;
        assert_eq!(health["status"], "ok");
        assert_eq!(health["scans_completed"], 2);
    }

    #[tokio::test]
    async fn unreadable_state_is_a_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);
        let data_dir = dir.path().join("data");
        std::fs::create_dir_all(&data_dir).unwrap();
        std::fs::write(data_dir.join("state.json"), "[1, 2").unwrap();

        let resp = app.clone().oneshot(get("/state")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json_body(resp).await["error"].is_string());

        let resp = app.oneshot(post_scan(r#"{ "date": "2025-03-14" }"#)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
