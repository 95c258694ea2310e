//! Router setup

use crate::handlers::{self, AppState};
use crate::pages;
use axum::http::StatusCode;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Create the application router: HTML pages plus the JSON API
pub fn create_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Pages
        .route("/", get(pages::home))
        .route("/aggregate", get(pages::aggregate))
        .route("/ranking", get(pages::ranking))
        .route("/analytical", get(pages::analytical))
        .route("/sample-data", get(pages::sample_data))
        .route("/custom", get(pages::custom_form).post(pages::custom_run))
        .route("/reference", get(pages::reference))
        .route("/rate/{reaction}", post(pages::rate))
        // JSON API
        .route("/api/query", post(handlers::api_query))
        .route("/api/tables", get(handlers::api_tables))
        .route("/api/lessons", get(handlers::api_lessons))
        // Health endpoints
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/stats", get(handlers::stats))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
