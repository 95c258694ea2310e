//! HTML templates for the cheat sheet pages.
//!
//! Plain `format!` interpolation over embedded markup. Anything that came from
//! a query, a cell or a form goes through [`html_escape`] before it lands in
//! the output.

use crate::error::WebError;
use crate::lessons::{Category, Example, Lesson, Section, CATEGORIES, CUSTOM_EXAMPLES};
use crate::rating::{RatingCounts, Reaction};
use crate::reference::{self, ReferenceTab};
use sqlwin_core::{ResultSet, SampleCatalog, SampleTable};

/// A query paired with what running it produced
pub type Outcome = std::result::Result<ResultSet, WebError>;

/// Everything the sidebar needs to render
pub struct SidebarContext<'a> {
    pub active: Section,
    pub catalog: &'a SampleCatalog,
    pub counts: RatingCounts,
    pub voted: bool,
    /// Path the rating forms send the browser back to
    pub return_to: &'a str,
    pub engine_version: &'a str,
}

/// Template renderer.
#[derive(Debug, Default)]
pub struct Templates;

impl Templates {
    pub fn new() -> Self {
        Self
    }

    /// Render the base layout around `content`.
    pub fn layout(&self, sidebar: &SidebarContext<'_>, content: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Window Functions Cheat Sheet</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <nav class="sidebar">
            {sidebar}
        </nav>
        <main class="content">
            <header class="banner">
                <h1>SQL Window Functions Cheat Sheet</h1>
                <p>Learn window functions by running real queries against sample tables</p>
            </header>
            {content}
            <footer class="footer">
                <p>Runs on an embedded SQLite {engine} database</p>
                <p>Compatible with: PostgreSQL, SQL Server, MySQL 8.0+, Oracle, Snowflake</p>
            </footer>
        </main>
    </div>
</body>
</html>"#,
            title = sidebar.active.title(),
            css = CSS,
            sidebar = self.sidebar(sidebar),
            content = content,
            engine = html_escape(sidebar.engine_version),
        )
    }

    fn sidebar(&self, ctx: &SidebarContext<'_>) -> String {
        let links: Vec<String> = Section::all()
            .iter()
            .map(|section| {
                let class = if *section == ctx.active { "active" } else { "" };
                format!(
                    r#"<a href="{href}" class="nav-link {class}">{label}</a>"#,
                    href = section.path(),
                    class = class,
                    label = section.title(),
                )
            })
            .collect();

        let tables: Vec<String> = ctx
            .catalog
            .tables()
            .iter()
            .map(|t| {
                format!(
                    "<li><strong>{}</strong>: {}</li>",
                    html_escape(t.name()),
                    html_escape(&t.column_list())
                )
            })
            .collect();

        format!(
            r#"<div class="logo"><h2>Navigation</h2></div>
<div class="nav-links">{links}</div>
<hr>
<h3>Available Tables</h3>
<ul class="table-list">{tables}</ul>
<hr>
<h3>Quick Tips</h3>
<ul class="tips">
    <li>Window functions are <strong>not</strong> the same as regular aggregate functions</li>
    <li>Always use <code>OVER()</code> clause to define window frame</li>
    <li>Use <code>PARTITION BY</code> to group rows for calculations</li>
    <li>Use <code>ORDER BY</code> within <code>OVER()</code> to define row order in window</li>
</ul>
<hr>
{rating}"#,
            links = links.join("\n"),
            tables = tables.join("\n"),
            rating = self.rating_widget(ctx),
        )
    }

    fn rating_widget(&self, ctx: &SidebarContext<'_>) -> String {
        let disabled = if ctx.voted { " disabled" } else { "" };
        let return_to = html_escape(ctx.return_to);

        let buttons: Vec<String> = Reaction::all()
            .iter()
            .map(|r| {
                format!(
                    r#"<form method="post" action="/rate/{slug}">
    <input type="hidden" name="return_to" value="{return_to}">
    <button type="submit" class="rate-btn"{disabled}>{label}</button>
</form>"#,
                    slug = r.slug(),
                    return_to = return_to,
                    disabled = disabled,
                    label = r.label(),
                )
            })
            .collect();

        let metrics: Vec<String> = Reaction::all()
            .iter()
            .map(|r| self.metric(r.metric_label(), &ctx.counts.get(*r).to_string()))
            .collect();

        let thanks = if ctx.voted {
            r#"<div class="alert success">Thanks for your rating! 😊</div>"#
        } else {
            ""
        };

        format!(
            r#"<h3>Rate This App</h3>
<div class="rate-row">{buttons}</div>
{thanks}
<hr>
<div class="metrics">{metrics}</div>"#,
            buttons = buttons.join("\n"),
            thanks = thanks,
            metrics = metrics.join("\n"),
        )
    }

    fn metric(&self, label: &str, value: &str) -> String {
        format!(
            r#"<div class="metric"><div class="metric-label">{}</div><div class="metric-value">{}</div></div>"#,
            html_escape(label),
            html_escape(value)
        )
    }

    fn section_header(&self, section: Section) -> String {
        let subtitle = section
            .subtitle()
            .map(|s| format!("<p class=\"subtitle\">{}</p>", html_escape(s)))
            .unwrap_or_default();
        format!("<h2>{}</h2>{}", html_escape(section.header()), subtitle)
    }

    /// Tab strip; `tabs` holds `(slug, label)` pairs
    fn tab_bar(&self, path: &str, tabs: &[(&str, &str)], active: &str) -> String {
        let items: Vec<String> = tabs
            .iter()
            .map(|(slug, label)| {
                let class = if *slug == active { "tab active" } else { "tab" };
                format!(
                    r#"<a href="{path}?tab={slug}" class="{class}">{label}</a>"#,
                    path = path,
                    slug = slug,
                    class = class,
                    label = html_escape(label),
                )
            })
            .collect();
        format!(r#"<div class="tabs">{}</div>"#, items.join(""))
    }

    fn code_block(&self, sql: &str) -> String {
        format!(
            r#"<pre class="code"><code class="language-sql">{}</code></pre>"#,
            html_escape(sql)
        )
    }

    /// Render a result as a table with a leading row index
    pub fn result_table(&self, result: &ResultSet) -> String {
        let mut html = String::from(r#"<div class="table-wrap"><table class="data-table"><thead><tr><th></th>"#);
        for column in &result.columns {
            html.push_str("<th>");
            html.push_str(&html_escape(&column.name));
            html.push_str("</th>");
        }
        html.push_str("</tr></thead><tbody>");

        for (i, row) in result.rows.iter().enumerate() {
            html.push_str(&format!("<tr><td class=\"index\">{}</td>", i));
            for value in &row.values {
                let class = if value.is_null() { " class=\"null\"" } else { "" };
                html.push_str(&format!("<td{}>{}</td>", class, html_escape(&value.to_string())));
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table></div>");

        if result.truncated {
            html.push_str(&format!(
                r#"<div class="alert warning">Showing the first {} rows only</div>"#,
                result.row_count()
            ));
        }
        html
    }

    fn error_box(&self, prefix: &str, err: &WebError) -> String {
        format!(
            r#"<div class="alert error">{}{}</div>"#,
            prefix,
            html_escape(&err.message())
        )
    }

    /// Home page content.
    pub fn home(&self) -> String {
        let cards: Vec<String> = CATEGORIES.iter().map(|c| self.category_card(c)).collect();

        format!(
            r#"<h2>{header} 👋</h2>
<div class="columns">
    <div>
        <h3>What are Window Functions?</h3>
        <p>Window functions perform calculations across a set of rows,
        maintaining all original rows without condensing results.</p>
        <h3>Key Benefits:</h3>
        <ul>
            <li>✅ Keep row-level detail with aggregate calculations</li>
            <li>✅ Compare individual values to group statistics</li>
            <li>✅ Rank and score data efficiently</li>
            <li>✅ Solve complex analytics in single query</li>
        </ul>
    </div>
    <div class="alert info">
        <h3>Quick Start:</h3>
        <ol>
            <li>Choose a function category from the sidebar</li>
            <li>View real examples with descriptions</li>
            <li>See query and output</li>
            <li>Try custom queries in "Custom Query" section</li>
            <li>Reference syntax in "Quick Reference"</li>
        </ol>
    </div>
</div>
<hr>
<div class="centered">
    <h2 class="categories-title">🎯 Core Window Function Categories</h2>
    <p class="subtitle">Master all 15+ window functions</p>
</div>
<div class="columns three">{cards}</div>"#,
            header = Section::Home.header(),
            cards = cards.join("\n"),
        )
    }

    fn category_card(&self, category: &Category) -> String {
        let functions: Vec<String> = category
            .functions
            .iter()
            .map(|f| {
                format!(
                    r#"<div class="func" style="border-left-color: {color}">▶️ <code style="color: {color}">{f}()</code></div>"#,
                    color = category.color,
                    f = f,
                )
            })
            .collect();

        format!(
            r#"<a class="card" href="{href}" style="border-left-color: {color}">
    <h2 style="color: {color}">{name}</h2>
    <p class="card-desc">{desc}</p>
    <div class="card-body">{functions}</div>
</a>"#,
            href = category.section.path(),
            color = category.color,
            name = category.name,
            desc = category.description,
            functions = functions.join("\n"),
        )
    }

    /// A function section showing one lesson tab with its example outcomes.
    pub fn lesson(
        &self,
        section: Section,
        tabs: &[Lesson],
        lesson: &Lesson,
        outcomes: &[(&Example, Outcome)],
    ) -> String {
        let tab_list: Vec<(&str, &str)> = tabs.iter().map(|l| (l.slug, l.tab)).collect();

        let key_point = lesson
            .key_point
            .map(|k| format!(r#"<div class="alert info"><strong>Key Point:</strong> {}</div>"#, html_escape(k)))
            .unwrap_or_default();
        let syntax = lesson
            .syntax
            .map(|s| format!("<p><strong>Syntax:</strong></p>{}", self.code_block(s)))
            .unwrap_or_default();

        let examples: Vec<String> = outcomes
            .iter()
            .map(|(example, outcome)| {
                let output = match outcome {
                    Ok(result) => self.result_table(result),
                    Err(e) => self.error_box("Error: ", e),
                };
                format!(
                    r#"<div class="columns example">
    <div><h4>{title}</h4>{code}</div>
    <div>{output}</div>
</div>"#,
                    title = html_escape(example.title),
                    code = self.code_block(example.sql),
                    output = output,
                )
            })
            .collect();

        format!(
            r#"{header}
{tabs}
<h3>{heading}</h3>
{key_point}
{syntax}
{examples}"#,
            header = self.section_header(section),
            tabs = self.tab_bar(section.path(), &tab_list, lesson.slug),
            heading = html_escape(lesson.heading),
            key_point = key_point,
            syntax = syntax,
            examples = examples.join("\n<hr>\n"),
        )
    }

    /// Sample data viewer for one table.
    pub fn sample_data(&self, catalog: &SampleCatalog, active: &SampleTable) -> String {
        let tab_list: Vec<(&str, &str)> = catalog.tables().iter().map(|t| (t.name(), t.title())).collect();

        format!(
            r#"{header}
{tabs}
<h3>{title} Table</h3>
<div class="alert info">{summary}</div>
{table}"#,
            header = self.section_header(Section::SampleData),
            tabs = self.tab_bar(Section::SampleData.path(), &tab_list, active.name()),
            title = html_escape(active.title()),
            summary = html_escape(active.summary()),
            table = self.result_table(&active.to_result_set()),
        )
    }

    /// Custom query form, with the outcome of the last run if any.
    pub fn custom_query(&self, catalog: &SampleCatalog, query: &str, outcome: Option<&Outcome>) -> String {
        let tables: Vec<String> = catalog
            .tables()
            .iter()
            .map(|t| {
                let columns: Vec<String> = t
                    .columns()
                    .iter()
                    .map(|c| format!("<li>{} ({})</li>", html_escape(c.name), c.sql_type.label()))
                    .collect();
                format!(
                    "<p><strong>{}</strong></p><ul>{}</ul>",
                    html_escape(t.name()),
                    columns.join("")
                )
            })
            .collect();

        let examples: Vec<String> = CUSTOM_EXAMPLES
            .iter()
            .map(|ex| self.code_block(&format!("-- {}\n{}", ex.title, ex.sql)))
            .collect();

        let result = match outcome {
            None => String::new(),
            Some(Err(e)) => self.error_box("❌ Query Error: ", e),
            Some(Ok(result)) => {
                let metrics = if result.is_empty() {
                    String::new()
                } else {
                    let kb = result.estimated_size_bytes() as f64 / 1024.0;
                    format!(
                        r#"<div class="columns three metrics">{}{}{}</div>"#,
                        self.metric("Rows Returned", &result.row_count().to_string()),
                        self.metric("Columns", &result.column_count().to_string()),
                        self.metric("Memory Usage", &format!("{:.2} KB", kb)),
                    )
                };
                format!(
                    r#"<div class="alert success">✅ Query executed successfully!</div>
{table}
{metrics}"#,
                    table = self.result_table(result),
                    metrics = metrics,
                )
            }
        };

        format!(
            r#"{header}
<div class="columns">
    <div><h3>Available Tables &amp; Columns:</h3>{tables}</div>
    <div><h3>Query Examples:</h3>{examples}</div>
</div>
<hr>
<form method="post" action="/custom" class="query-form">
    <label for="query"><strong>Enter your SQL query:</strong></label>
    <textarea id="query" name="query" rows="14" spellcheck="false">{query}</textarea>
    <button type="submit" class="primary">🚀 Execute Query</button>
</form>
{result}"#,
            header = self.section_header(Section::CustomQuery),
            tables = tables.join("\n"),
            examples = examples.join("\n"),
            query = html_escape(query),
            result = result,
        )
    }

    /// Quick reference page for one tab.
    pub fn reference(&self, tab: ReferenceTab) -> String {
        let tab_list: Vec<(&str, &str)> = ReferenceTab::all().iter().map(|t| (t.slug(), t.label())).collect();

        let body = match tab {
            ReferenceTab::Syntax => {
                let mut html = String::new();
                for snippet in reference::SYNTAX {
                    html.push_str(&format!("<h3>{}</h3>{}", snippet.title, self.code_block(snippet.sql)));
                }
                let [rows, range] = &reference::ROWS_VS_RANGE;
                html.push_str(&format!(
                    r#"<h3>RANGE vs ROWS</h3>
<div class="columns">
    <div><p><strong>{}</strong></p>{}</div>
    <div><p><strong>{}</strong></p>{}</div>
</div>"#,
                    rows.title,
                    self.code_block(rows.sql),
                    range.title,
                    self.code_block(range.sql),
                ));
                html
            }
            ReferenceTab::Patterns => reference::PATTERNS
                .iter()
                .map(|s| format!("<h3>{}</h3>{}", s.title, self.code_block(s.sql)))
                .collect(),
            ReferenceTab::Mistakes => reference::MISTAKES
                .iter()
                .map(|m| {
                    format!(
                        r#"<h3>❌ {title}</h3>
<div class="columns">
    <div><div class="alert error"><strong>Wrong</strong></div>{wrong}</div>
    <div><div class="alert success"><strong>Correct</strong></div>{correct}</div>
</div>"#,
                        title = m.title,
                        wrong = self.code_block(m.wrong),
                        correct = self.code_block(m.correct),
                    )
                })
                .collect(),
            ReferenceTab::Tips => {
                let tips: Vec<String> = reference::TIPS
                    .iter()
                    .map(|t| {
                        format!(
                            "<li><strong>{}</strong>: {}{}</li>",
                            t.title,
                            t.detail,
                            self.code_block(t.sql)
                        )
                    })
                    .collect();
                format!(
                    r#"<h3>✅ Performance Tips</h3>
<ol>{}</ol>
<h3>When to Use Which Function</h3>
{}"#,
                    tips.join("\n"),
                    self.result_table(&reference::use_case_table())
                )
            }
        };

        format!(
            "<h2>{}</h2>\n{}\n{}",
            Section::QuickReference.header(),
            self.tab_bar(Section::QuickReference.path(), &tab_list, tab.slug()),
            body
        )
    }
}

/// Escape text for HTML element content and quoted attributes.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const CSS: &str = r#"
:root {
    --bg-primary: #ffffff;
    --bg-secondary: #f0f2f6;
    --text-primary: #262730;
    --text-secondary: #555867;
    --accent-primary: #1f77b4;
    --success: #21c354;
    --warning: #ffbd45;
    --error: #ff4b4b;
    --border: #d6d6d9;
}

* { margin: 0; padding: 0; box-sizing: border-box; }

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    background: var(--bg-primary);
    color: var(--text-primary);
    line-height: 1.6;
}

.container { display: flex; min-height: 100vh; }

.sidebar {
    width: 300px;
    flex-shrink: 0;
    background: var(--bg-secondary);
    padding: 1.5rem 1rem;
    font-size: 0.9rem;
}
.sidebar h3 { margin: 0.75rem 0 0.5rem; }
.sidebar ul { padding-left: 1.2rem; }
.sidebar hr { margin: 1rem 0; border: none; border-top: 1px solid var(--border); }

.nav-links { display: flex; flex-direction: column; gap: 0.25rem; }
.nav-link { color: var(--text-primary); text-decoration: none; padding: 0.35rem 0.6rem; border-radius: 6px; }
.nav-link:hover { background: #e4e6eb; }
.nav-link.active { background: var(--accent-primary); color: #fff; }

.content { flex: 1; padding: 2rem 3rem; min-width: 0; }
.content h2 { margin: 1rem 0 0.5rem; }
.content h3 { margin: 1rem 0 0.5rem; }
.content hr { margin: 1.5rem 0; border: none; border-top: 1px solid var(--border); }

.banner {
    text-align: center;
    padding: 1.5rem;
    border-radius: 10px;
    background: linear-gradient(90deg, #1f77b4 0%, #2ca02c 100%);
    color: #fff;
}
.subtitle { color: var(--text-secondary); }
.centered { text-align: center; margin: 2rem 0 1rem; }
.categories-title { color: var(--accent-primary); font-size: 2.2rem; }

.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
.columns.three { grid-template-columns: 1fr 1fr 1fr; }
.example { margin: 1rem 0; }

.tabs { display: flex; gap: 0.25rem; border-bottom: 2px solid var(--border); margin: 1rem 0; flex-wrap: wrap; }
.tab { padding: 0.5rem 1rem; text-decoration: none; color: var(--text-secondary); border-bottom: 2px solid transparent; margin-bottom: -2px; }
.tab.active { color: var(--error); border-bottom-color: var(--error); }

.code {
    background: #f8f9fb;
    border: 1px solid var(--border);
    border-radius: 6px;
    padding: 0.75rem 1rem;
    overflow-x: auto;
    font-size: 0.85rem;
    margin: 0.5rem 0;
}

.table-wrap { overflow-x: auto; max-height: 480px; border: 1px solid var(--border); border-radius: 6px; }
.data-table { border-collapse: collapse; width: 100%; font-size: 0.85rem; }
.data-table th, .data-table td { padding: 0.3rem 0.6rem; border-bottom: 1px solid var(--border); text-align: left; white-space: nowrap; }
.data-table th { background: var(--bg-secondary); position: sticky; top: 0; }
.data-table td.index { color: var(--text-secondary); }
.data-table td.null { color: var(--text-secondary); font-style: italic; }

.alert { padding: 0.75rem 1rem; border-radius: 6px; margin: 0.75rem 0; }
.alert.info { background: #e8f1fb; color: #0b4a80; }
.alert.success { background: #e6f6ea; color: #177233; }
.alert.warning { background: #fff6e0; color: #8a5a00; }
.alert.error { background: #fdecec; color: #9b1c1c; white-space: pre-wrap; }

.card {
    display: block;
    text-decoration: none;
    color: inherit;
    border-left: 5px solid;
    border-radius: 10px;
    padding: 0.75rem;
    box-shadow: 0 4px 15px rgba(0, 0, 0, 0.1);
}
.card-desc { color: var(--text-secondary); font-style: italic; margin-bottom: 1rem; }
.card-body { background: #fff; padding: 0.75rem; border-radius: 8px; }
.func { padding: 0.5rem 0.75rem; margin: 0.5rem 0; border-radius: 6px; border-left: 3px solid; font-weight: bold; background: var(--bg-secondary); }

.query-form { display: flex; flex-direction: column; gap: 0.5rem; }
.query-form textarea { font-family: monospace; font-size: 0.9rem; padding: 0.75rem; border: 1px solid var(--border); border-radius: 6px; }
button.primary { align-self: flex-start; padding: 0.5rem 1.25rem; border: none; border-radius: 6px; background: var(--error); color: #fff; cursor: pointer; }

.rate-row { display: flex; gap: 0.35rem; }
.rate-btn { padding: 0.35rem 0.6rem; border: 1px solid var(--border); border-radius: 6px; background: #fff; cursor: pointer; }
.rate-btn:disabled { opacity: 0.5; cursor: not-allowed; }

.metrics { display: flex; gap: 1rem; }
.metric-label { font-size: 0.8rem; color: var(--text-secondary); }
.metric-value { font-size: 1.5rem; }

.footer { text-align: center; color: #666; font-size: 0.9rem; margin-top: 3rem; border-top: 1px solid var(--border); padding-top: 1rem; }
"#;
