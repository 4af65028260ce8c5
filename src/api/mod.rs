use crate::checker::{CheckEvent, CheckSettings, UrlChecker};
use crate::config::Config;
use crate::logger::CheckLogEntry;
use crate::stats::StatsCollector;
use axum::{
    extract::{Json as AxumJson, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

struct ApiState {
    checker: Arc<UrlChecker>,
    stats: Arc<StatsCollector>,
    config: Config,
    logs_buffer: Arc<RwLock<VecDeque<CheckLogEntry>>>,
}

pub async fn start_api_server(
    checker: Arc<UrlChecker>,
    stats: Arc<StatsCollector>,
    config: Config,
    logs_buffer: Arc<RwLock<VecDeque<CheckLogEntry>>>,
    port: u16,
) {
    let state = Arc::new(ApiState {
        checker,
        stats,
        config,
        logs_buffer,
    });

    let app = Router::new()
        .route("/api/check", post(manual_check))
        .route("/api/event", post(handle_event))
        .route("/api/status", get(get_status))
        .route("/api/config", get(get_config))
        .route("/api/settings", put(update_settings))
        .route("/api/stats", get(get_stats))
        .route("/api/logs", get(get_logs))
        .with_state(state);

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("API Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

#[derive(serde::Deserialize)]
struct CheckRequest {
    url: String,
}

async fn manual_check(
    State(state): State<Arc<ApiState>>,
    AxumJson(payload): AxumJson<CheckRequest>,
) -> impl IntoResponse {
    match state.checker.handle_manual(&payload.url).await {
        Ok(response) => (StatusCode::OK, Json(serde_json::json!(response))),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({
                "error": e.to_string(),
                "attempts": e.attempts(),
            })),
        ),
    }
}

async fn handle_event(
    State(state): State<Arc<ApiState>>,
    AxumJson(event): AxumJson<CheckEvent>,
) -> impl IntoResponse {
    Json(state.checker.handle_event(event).await)
}

async fn get_status(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let settings = state.checker.settings();
    Json(serde_json::json!({
        "variant": state.config.variant,
        "auto_check_enabled": settings.auto_check_enabled,
        "banner_enabled": settings.banner_enabled,
        "cached_domains": state.checker.cache().len(),
    }))
}

async fn get_config(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Json(state.config.clone())
}

async fn update_settings(
    State(state): State<Arc<ApiState>>,
    AxumJson(settings): AxumJson<CheckSettings>,
) -> impl IntoResponse {
    state.checker.update_settings(settings);
    Json(serde_json::json!({ "status": "updated" }))
}

async fn get_stats(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Json(state.stats.get_snapshot())
}

async fn get_logs(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let buffer = state.logs_buffer.read().unwrap();
    // Return recent logs, reversed so newest first
    let logs: Vec<CheckLogEntry> = buffer.iter().rev().cloned().collect();
    Json(logs)
}
