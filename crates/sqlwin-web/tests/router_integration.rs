use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use sqlwin_core::SampleCatalog;
use sqlwin_engine::{QueryRunner, RunnerConfig};
use sqlwin_web::lessons::{self, Section};
use sqlwin_web::templates::html_escape;
use sqlwin_web::{create_router, AppState};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn create_test_state() -> Arc<AppState> {
    let catalog = Arc::new(SampleCatalog::standard().unwrap());
    let runner = Arc::new(QueryRunner::new(&catalog, RunnerConfig::default()).unwrap());
    Arc::new(AppState::new(runner, catalog, 4, Duration::from_secs(5)))
}

fn app(state: &Arc<AppState>) -> Router {
    create_router(Arc::clone(state), Duration::from_secs(30))
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn get(state: &Arc<AppState>, uri: &str) -> Response {
    app(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn form_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

async fn post_custom(state: &Arc<AppState>, query: &str) -> Response {
    app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/custom")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!("query={}", form_encode(query))))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn post_api_query(state: &Arc<AppState>, query: &str) -> Response {
    let body = serde_json::json!({ "query": query }).to_string();
    app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/query")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn post_rate(state: &Arc<AppState>, reaction: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/rate/{}", reaction))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app(state)
        .oneshot(
            builder
                .body(Body::from("return_to=%2Franking%3Ftab%3Dntile"))
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_home_page() {
    let state = create_test_state();
    let response = get(&state, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("Core Window Function Categories"));
    assert!(html.contains("PERCENT_RANK()"));
}

#[tokio::test]
async fn test_every_lesson_tab_renders_without_errors() {
    let state = create_test_state();
    for section in [Section::Aggregate, Section::Ranking, Section::Analytical] {
        for lesson in lessons::lessons_for(section) {
            let uri = format!("{}?tab={}", section.path(), lesson.slug);
            let response = get(&state, &uri).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);

            let html = body_string(response).await;
            assert!(html.contains(&html_escape(lesson.heading)), "{}", uri);
            assert!(!html.contains("alert error"), "{} rendered an error", uri);
            assert!(html.contains("data-table"), "{}", uri);
        }
    }
    assert_eq!(state.stats.failed(), 0);
    assert_eq!(state.stats.executed() as usize, lessons::all_examples().count());
}

#[tokio::test]
async fn test_unknown_tab_falls_back_to_first() {
    let state = create_test_state();
    let html = body_string(get(&state, "/ranking?tab=nope").await).await;
    assert!(html.contains("ROW_NUMBER() - Unique Sequential Numbering"));

    let html = body_string(get(&state, "/sample-data?tab=nope").await).await;
    assert!(html.contains("Employees Table"));

    let html = body_string(get(&state, "/reference?tab=nope").await).await;
    assert!(html.contains("Basic Window Function Syntax"));
}

#[tokio::test]
async fn test_sample_data_tab() {
    let state = create_test_state();
    let html = body_string(get(&state, "/sample-data?tab=orders").await).await;
    assert!(html.contains("Orders Table"));
    assert!(html.contains("20 orders from 9 customers at different dates"));
    assert!(html.contains("2024-01-01 00:00:00"));
}

#[tokio::test]
async fn test_custom_form_shows_default_query() {
    let state = create_test_state();
    let html = body_string(get(&state, "/custom").await).await;
    assert!(html.contains("AVG(salary) OVER (PARTITION BY department) AS avg_salary"));
    assert!(!html.contains("Query executed successfully"));
}

#[tokio::test]
async fn test_custom_query_success() {
    let state = create_test_state();
    let response = post_custom(&state, "SELECT product, SUM(amount) OVER () AS total FROM sales").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("✅ Query executed successfully!"));
    assert!(html.contains("Rows Returned"));
    assert!(html.contains("3550"));
}

#[tokio::test]
async fn test_custom_query_error_renders_in_place() {
    let state = create_test_state();
    let response = post_custom(&state, "SELECT * FROM nope").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("❌ Query Error: no such table: nope"));
    assert!(html.contains("SELECT * FROM nope</textarea>"));
}

#[tokio::test]
async fn test_custom_query_cannot_modify_sample_data() {
    let state = create_test_state();
    let html = body_string(post_custom(&state, "DELETE FROM employees").await).await;
    assert!(html.contains("❌ Query Error:"));

    let response = post_api_query(&state, "SELECT COUNT(*) AS n FROM employees").await;
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["rows"][0][0], 10);
}

#[tokio::test]
async fn test_custom_query_output_is_escaped() {
    let state = create_test_state();
    let html = body_string(post_custom(&state, "SELECT '<script>x</script>' AS s").await).await;
    assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
    assert!(!html.contains("<script>x</script>"));
}

#[tokio::test]
async fn test_api_query() {
    let state = create_test_state();
    let response = post_api_query(&state, "SELECT employee_id, salary FROM employees ORDER BY employee_id").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["row_count"], 10);
    assert_eq!(json["truncated"], false);
    assert_eq!(json["columns"][0]["name"], "employee_id");
    assert_eq!(json["rows"][0][1], 60000);
    assert!(json["execution_time_ms"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_api_query_errors() {
    let state = create_test_state();

    let response = post_api_query(&state, "SELECT no_such_column FROM employees").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["code"], "query");
    assert!(json["error"].as_str().unwrap().starts_with("no such column"));

    let response = post_api_query(&state, "SELECT 1; SELECT 2").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["code"], "multiple_statements");

    let response = post_api_query(&state, "   ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["code"], "empty_query");

    assert_eq!(state.stats.failed(), 3);
}

#[tokio::test]
async fn test_api_tables_and_lessons() {
    let state = create_test_state();

    let json: Value = serde_json::from_str(&body_string(get(&state, "/api/tables").await).await).unwrap();
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["employees", "sales", "orders", "performance"]);
    assert_eq!(json[1]["row_count"], 20);

    let json: Value = serde_json::from_str(&body_string(get(&state, "/api/lessons").await).await).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 16);
    assert_eq!(entries[0]["section"], "aggregate");
    assert_eq!(entries[0]["tab"], "sum");
}

#[tokio::test]
async fn test_rating_once_per_browser() {
    let state = create_test_state();

    let response = post_rate(&state, "love", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/ranking?tab=ntile");
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("sqlwin_rated=1"));
    assert_eq!(state.ratings.snapshot().loves, 1);

    let response = post_rate(&state, "like", Some("sqlwin_rated=1")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(state.ratings.snapshot().likes, 0);

    let html = body_string(
        app(&state)
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::COOKIE, "sqlwin_rated=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;
    assert!(html.contains("Thanks for your rating!"));

    let response = post_rate(&state, "meh", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_query_busy_when_no_slot_frees_up() {
    let catalog = Arc::new(SampleCatalog::standard().unwrap());
    let runner = Arc::new(QueryRunner::new(&catalog, RunnerConfig::default()).unwrap());
    let state = Arc::new(AppState::new(runner, catalog, 1, Duration::from_millis(50)));

    let held = Arc::clone(&state.query_semaphore).acquire_owned().await.unwrap();
    let response = post_api_query(&state, "SELECT 1").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["code"], "busy");
    assert_eq!(state.stats.executed(), 0);

    drop(held);
    let response = post_api_query(&state, "SELECT 1").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_ready_stats() {
    let state = create_test_state();

    let response = get(&state, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["status"], "healthy");

    let json: Value = serde_json::from_str(&body_string(get(&state, "/ready").await).await).unwrap();
    assert_eq!(json["ready"], true);

    post_api_query(&state, "SELECT 1").await;
    let json: Value = serde_json::from_str(&body_string(get(&state, "/stats").await).await).unwrap();
    assert_eq!(json["queries_executed"], 1);
    assert_eq!(json["queries_failed"], 0);
    assert_eq!(json["queries_in_flight"], 0);
    assert_eq!(json["votes"]["loves"], 0);
}
