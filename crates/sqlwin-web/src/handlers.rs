//! Shared state and JSON API handlers

use crate::error::{Result, WebError};
use crate::lessons::{self, Section};
use crate::rating::{RatingBoard, RatingCounts};
use crate::templates::Templates;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use sqlwin_core::{Column, ResultSet, Row, SampleCatalog};
use sqlwin_engine::{QueryRunner, TableInfo};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Counters reported by `/stats`
#[derive(Debug, Default)]
pub struct QueryStats {
    executed: AtomicU64,
    failed: AtomicU64,
}

impl QueryStats {
    pub fn executed(&self) -> u64 {
        self.executed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    fn record(&self, ok: bool) {
        self.executed.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Application state shared across handlers
pub struct AppState {
    pub runner: Arc<QueryRunner>,
    pub catalog: Arc<SampleCatalog>,
    pub ratings: RatingBoard,
    pub stats: QueryStats,
    pub templates: Templates,
    pub query_semaphore: Arc<Semaphore>,
    pub max_concurrent_queries: usize,
    /// How long a request waits for a free query slot before giving up
    pub queue_timeout: Duration,
    start_time: Instant,
}

impl AppState {
    pub fn new(
        runner: Arc<QueryRunner>,
        catalog: Arc<SampleCatalog>,
        max_concurrent_queries: usize,
        queue_timeout: Duration,
    ) -> Self {
        let max_concurrent_queries = max_concurrent_queries.max(1);
        Self {
            runner,
            catalog,
            ratings: RatingBoard::new(),
            stats: QueryStats::default(),
            templates: Templates::new(),
            query_semaphore: Arc::new(Semaphore::new(max_concurrent_queries)),
            max_concurrent_queries,
            queue_timeout,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Run one query on the blocking pool behind the concurrency limit.
///
/// The permit moves into the blocking task so it stays held until the engine
/// returns, even if the client goes away first.
pub async fn run_query(state: &AppState, sql: String) -> Result<ResultSet> {
    let permit = tokio::time::timeout(
        state.queue_timeout,
        Arc::clone(&state.query_semaphore).acquire_owned(),
    )
    .await
    .map_err(|_| {
        warn!(timeout = ?state.queue_timeout, "No query slot became free");
        WebError::Busy
    })?
    .map_err(|_| WebError::Internal("Query semaphore closed".to_string()))?;

    let runner = Arc::clone(&state.runner);
    let outcome = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        runner.execute(&sql)
    })
    .await
    .map_err(|e| WebError::Internal(format!("Query task failed: {}", e)))?;

    state.stats.record(outcome.is_ok());
    if let Err(e) = &outcome {
        debug!(code = e.code(), error = %e, "Query rejected");
    }
    Ok(outcome?)
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Ready check response
#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub uptime_seconds: u64,
}

/// The sample data is loaded before the router exists, so this is always ready
pub async fn ready(State(state): State<Arc<AppState>>) -> Json<ReadyResponse> {
    Json(ReadyResponse {
        ready: true,
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Stats response
#[derive(Serialize)]
pub struct StatsResponse {
    pub queries_executed: u64,
    pub queries_failed: u64,
    pub queries_in_flight: usize,
    pub votes: RatingCounts,
    pub engine_version: String,
    pub uptime_seconds: u64,
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        queries_executed: state.stats.executed(),
        queries_failed: state.stats.failed(),
        queries_in_flight: state
            .max_concurrent_queries
            .saturating_sub(state.query_semaphore.available_permits()),
        votes: state.ratings.snapshot(),
        engine_version: state.runner.engine_version().to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Query request body
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Query response
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub row_count: usize,
    pub truncated: bool,
    pub execution_time_ms: f64,
}

impl From<ResultSet> for QueryResponse {
    fn from(result: ResultSet) -> Self {
        Self {
            row_count: result.row_count(),
            truncated: result.truncated,
            execution_time_ms: result.elapsed_ms,
            columns: result.columns,
            rows: result.rows,
        }
    }
}

/// Execute a SQL query
pub async fn api_query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let result = run_query(&state, req.query).await?;
    Ok(Json(result.into()))
}

/// List the tables known to the engine
pub async fn api_tables(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TableInfo>>> {
    let runner = Arc::clone(&state.runner);
    let tables = tokio::task::spawn_blocking(move || runner.tables())
        .await
        .map_err(|e| WebError::Internal(format!("Table listing failed: {}", e)))??;
    Ok(Json(tables))
}

/// One canned example in the lesson listing
#[derive(Debug, Serialize)]
pub struct LessonEntry {
    pub section: Section,
    pub tab: &'static str,
    pub title: &'static str,
    pub sql: &'static str,
}

/// List every canned lesson query
pub async fn api_lessons() -> Json<Vec<LessonEntry>> {
    let entries = lessons::all_examples()
        .map(|(section, lesson, example)| LessonEntry {
            section,
            tab: lesson.slug,
            title: example.title,
            sql: example.sql,
        })
        .collect();
    Json(entries)
}
