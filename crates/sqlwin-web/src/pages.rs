//! HTML page handlers
//!
//! A failed query never turns into an error status here: the engine's message
//! is rendered where the result would have been.

use crate::error::{Result, WebError};
use crate::handlers::{run_query, AppState};
use crate::lessons::{self, Section, DEFAULT_CUSTOM_QUERY};
use crate::rating::{self, Reaction};
use crate::reference::ReferenceTab;
use crate::templates::{Outcome, SidebarContext};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// `?tab=` selector shared by the tabbed pages
#[derive(Debug, Default, Deserialize)]
pub struct TabQuery {
    pub tab: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CustomQueryForm {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct RateForm {
    pub return_to: Option<String>,
}

/// Wrap page content in the layout with a sidebar for this request
fn render(
    state: &AppState,
    headers: &HeaderMap,
    active: Section,
    return_to: &str,
    content: &str,
) -> Html<String> {
    let sidebar = SidebarContext {
        active,
        catalog: &state.catalog,
        counts: state.ratings.snapshot(),
        voted: rating::has_voted(headers),
        return_to,
        engine_version: state.runner.engine_version(),
    };
    Html(state.templates.layout(&sidebar, content))
}

pub async fn home(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Html<String> {
    let content = state.templates.home();
    render(&state, &headers, Section::Home, Section::Home.path(), &content)
}

pub async fn aggregate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<TabQuery>,
) -> Html<String> {
    lesson_page(&state, &headers, Section::Aggregate, query.tab.as_deref()).await
}

pub async fn ranking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<TabQuery>,
) -> Html<String> {
    lesson_page(&state, &headers, Section::Ranking, query.tab.as_deref()).await
}

pub async fn analytical(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<TabQuery>,
) -> Html<String> {
    lesson_page(&state, &headers, Section::Analytical, query.tab.as_deref()).await
}

/// Run every example of the selected tab and show query next to output
async fn lesson_page(
    state: &AppState,
    headers: &HeaderMap,
    section: Section,
    tab: Option<&str>,
) -> Html<String> {
    let Some(lesson) = lessons::find_lesson(section, tab) else {
        return render(state, headers, section, section.path(), "");
    };

    let mut outcomes = Vec::with_capacity(lesson.examples.len());
    for example in lesson.examples {
        let outcome: Outcome = run_query(state, example.sql.to_string()).await;
        outcomes.push((example, outcome));
    }

    let content = state
        .templates
        .lesson(section, lessons::lessons_for(section), lesson, &outcomes);
    let return_to = format!("{}?tab={}", section.path(), lesson.slug);
    render(state, headers, section, &return_to, &content)
}

pub async fn sample_data(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<TabQuery>,
) -> Html<String> {
    let catalog = &state.catalog;
    let table = query
        .tab
        .as_deref()
        .and_then(|t| catalog.table(t))
        .or_else(|| catalog.tables().first());

    match table {
        Some(table) => {
            let content = state.templates.sample_data(catalog, table);
            let return_to = format!("{}?tab={}", Section::SampleData.path(), table.name());
            render(&state, &headers, Section::SampleData, &return_to, &content)
        }
        None => render(&state, &headers, Section::SampleData, Section::SampleData.path(), ""),
    }
}

pub async fn custom_form(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Html<String> {
    let content = state
        .templates
        .custom_query(&state.catalog, DEFAULT_CUSTOM_QUERY, None);
    render(&state, &headers, Section::CustomQuery, Section::CustomQuery.path(), &content)
}

pub async fn custom_run(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<CustomQueryForm>,
) -> Html<String> {
    let outcome = run_query(&state, form.query.clone()).await;
    let content = state
        .templates
        .custom_query(&state.catalog, &form.query, Some(&outcome));
    render(&state, &headers, Section::CustomQuery, Section::CustomQuery.path(), &content)
}

pub async fn reference(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<TabQuery>,
) -> Html<String> {
    let tab = ReferenceTab::from_slug(query.tab.as_deref());
    let content = state.templates.reference(tab);
    let return_to = format!("{}?tab={}", Section::QuickReference.path(), tab.slug());
    render(&state, &headers, Section::QuickReference, &return_to, &content)
}

/// Record a vote unless this browser already voted, then go back
pub async fn rate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(reaction): Path<String>,
    Form(form): Form<RateForm>,
) -> Result<Response> {
    let reaction = Reaction::from_slug(&reaction)
        .ok_or_else(|| WebError::NotFound(format!("Unknown reaction '{}'", reaction)))?;
    let target = safe_return_path(form.return_to.as_deref());

    if rating::has_voted(&headers) {
        return Ok(Redirect::to(target).into_response());
    }

    let count = state.ratings.record(reaction);
    info!(reaction = reaction.slug(), count, "Rating recorded");

    Ok((
        [(header::SET_COOKIE, rating::rated_cookie())],
        Redirect::to(target),
    )
        .into_response())
}

/// Only same-site absolute paths are followed; anything else goes home
fn safe_return_path(path: Option<&str>) -> &str {
    match path {
        Some(p)
            if p.starts_with('/')
                && !p.starts_with("//")
                && p.bytes().all(|b| b.is_ascii_graphic() && b != b'\\') =>
        {
            p
        }
        _ => "/",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_return_path() {
        assert_eq!(safe_return_path(Some("/ranking?tab=ntile")), "/ranking?tab=ntile");
        assert_eq!(safe_return_path(Some("//evil.example")), "/");
        assert_eq!(safe_return_path(Some("https://evil.example")), "/");
        assert_eq!(safe_return_path(Some("/\\evil.example")), "/");
        assert_eq!(safe_return_path(Some("/a b")), "/");
        assert_eq!(safe_return_path(Some("/x\r\nSet-Cookie: y")), "/");
        assert_eq!(safe_return_path(None), "/");
    }
}
