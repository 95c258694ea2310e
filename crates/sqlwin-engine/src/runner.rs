//! Query runner
//!
//! The `QueryRunner` owns an in-memory SQLite database seeded with the sample
//! catalog. After seeding the connection is switched to `query_only`, so the
//! engine itself refuses every write. An authorizer rejects any pragma that
//! would switch it back, and refuses `ATTACH`/`DETACH` so no other database
//! file can be opened or created. The sample data stays untouched for the
//! lifetime of the process. All access is serialized through a `Mutex`
//! because `rusqlite::Connection` is not `Sync`.

use crate::error::{QueryError, Result};
use crate::seed::{self, quote_ident};
use crate::statement::count_statements;
use parking_lot::Mutex;
use rusqlite::hooks::{AuthAction, AuthContext, Authorization};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, ErrorCode};
use serde::Serialize;
use sqlwin_core::{CellValue, Column, ResultSet, Row, SampleCatalog};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Maximum number of rows returned by a single query.
const DEFAULT_MAX_ROWS: usize = 10_000;

/// Default query timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Number of VM instructions between deadline checks.
const PROGRESS_INTERVAL_OPS: i32 = 1_000;

/// Runner limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Rows beyond this are dropped and the result is marked truncated
    pub max_rows: usize,
    /// Statement deadline
    pub query_timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            query_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

/// Information about a table known to the engine.
#[derive(Debug, Clone, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<TableColumn>,
    pub row_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableColumn {
    pub name: String,
    pub data_type: String,
}

/// Executes caller-supplied SQL against the sample tables
pub struct QueryRunner {
    conn: Mutex<Connection>,
    config: RunnerConfig,
}

impl QueryRunner {
    /// Open an in-memory database and load `catalog` into it
    pub fn new(catalog: &SampleCatalog, config: RunnerConfig) -> Result<Self> {
        let mut conn = Connection::open_in_memory().map_err(|e| {
            QueryError::Engine(format!("Failed to open in-memory SQLite database: {}", e))
        })?;

        let rows = seed::load_catalog(&mut conn, catalog)?;

        conn.pragma_update(None, "query_only", true)
            .map_err(|e| QueryError::Engine(format!("Failed to enable query_only: {}", e)))?;
        conn.authorizer(Some(guard_read_only));

        info!(
            tables = catalog.len(),
            rows,
            sqlite = rusqlite::version(),
            "Query runner initialized (in-memory, read-only)"
        );

        Ok(Self {
            conn: Mutex::new(conn),
            config,
        })
    }

    /// Runner seeded with the standard sample catalog and default limits
    pub fn with_standard_catalog() -> Result<Self> {
        Self::new(&SampleCatalog::standard()?, RunnerConfig::default())
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Version string of the embedded SQLite library
    pub fn engine_version(&self) -> &'static str {
        rusqlite::version()
    }

    /// Execute one SQL statement and collect its rows.
    ///
    /// Rejections by the engine surface as [`QueryError::Execution`] carrying
    /// the engine's message unchanged.
    pub fn execute(&self, sql: &str) -> Result<ResultSet> {
        match count_statements(sql) {
            Some(0) => return Err(QueryError::EmptyQuery),
            Some(1) | None => {}
            Some(n) => return Err(QueryError::MultipleStatements(n)),
        }

        let conn = self.conn.lock();

        // The deadline starts once the connection is ours, not while queued
        let start = Instant::now();
        let deadline = start + self.config.query_timeout;
        conn.progress_handler(PROGRESS_INTERVAL_OPS, Some(move || Instant::now() > deadline));
        let result = self.run_query(&conn, sql);
        conn.progress_handler(0, None::<fn() -> bool>);

        let mut result = result?;
        result.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        debug!(
            rows = result.row_count(),
            columns = result.column_count(),
            truncated = result.truncated,
            elapsed_ms = result.elapsed_ms,
            "Query executed"
        );
        Ok(result)
    }

    /// List every table known to the engine with its columns and row count
    pub fn tables(&self) -> Result<Vec<TableInfo>> {
        let conn = self.conn.lock();

        let names: Vec<String> = {
            let mut stmt = conn
                .prepare(
                    "SELECT name FROM sqlite_master \
                     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY rowid",
                )
                .map_err(engine_error)?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0)).map_err(engine_error)?;
            rows.collect::<rusqlite::Result<_>>().map_err(engine_error)?
        };

        let mut tables = Vec::with_capacity(names.len());
        for name in names {
            let columns = {
                let mut stmt = conn
                    .prepare(&format!("PRAGMA table_info({})", quote_ident(&name)))
                    .map_err(engine_error)?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok(TableColumn {
                            name: row.get(1)?,
                            data_type: row.get(2)?,
                        })
                    })
                    .map_err(engine_error)?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_err(engine_error)?
            };

            let row_count = conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", quote_ident(&name)), [], |row| {
                    row.get::<_, i64>(0)
                })
                .map_err(engine_error)? as usize;

            tables.push(TableInfo {
                name,
                columns,
                row_count,
            });
        }

        Ok(tables)
    }

    // ── Private helpers ─────────────────────────────────────────────────

    fn run_query(&self, conn: &Connection, sql: &str) -> Result<ResultSet> {
        let mut stmt = conn.prepare(sql).map_err(|e| self.execution_error(e))?;

        let columns: Vec<Column> = stmt
            .columns()
            .iter()
            .map(|c| Column {
                name: c.name().to_string(),
                decl_type: c.decl_type().map(str::to_string),
            })
            .collect();
        let column_count = columns.len();

        let mut rows = Vec::new();
        let mut truncated = false;
        let mut cursor = stmt.query([]).map_err(|e| self.execution_error(e))?;
        while let Some(row) = cursor.next().map_err(|e| self.execution_error(e))? {
            if rows.len() >= self.config.max_rows {
                debug!(max_rows = self.config.max_rows, "Query result truncated at max rows");
                truncated = true;
                break;
            }
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value = row.get_ref(i).map_err(|e| self.execution_error(e))?;
                values.push(cell_from_ref(value));
            }
            rows.push(Row::new(values));
        }

        let mut result = ResultSet::new(columns, rows);
        result.truncated = truncated;
        Ok(result)
    }

    fn execution_error(&self, e: rusqlite::Error) -> QueryError {
        if e.sqlite_error_code() == Some(ErrorCode::OperationInterrupted) {
            let ms = self.config.query_timeout.as_millis() as u64;
            warn!(timeout_ms = ms, "Query interrupted at deadline");
            QueryError::Timeout(ms)
        } else {
            QueryError::Execution(e.to_string())
        }
    }
}

/// Refuse switching `query_only` back off and opening other databases
fn guard_read_only(ctx: AuthContext<'_>) -> Authorization {
    match ctx.action {
        AuthAction::Pragma {
            pragma_name,
            pragma_value: Some(_),
        } if pragma_name.eq_ignore_ascii_case("query_only") => Authorization::Deny,
        AuthAction::Attach { .. } | AuthAction::Detach { .. } => Authorization::Deny,
        _ => Authorization::Allow,
    }
}

fn engine_error(e: rusqlite::Error) -> QueryError {
    QueryError::Engine(e.to_string())
}

fn cell_from_ref(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(n) => CellValue::Integer(n),
        ValueRef::Real(f) => CellValue::Real(f),
        ValueRef::Text(s) => CellValue::Text(String::from_utf8_lossy(s).into_owned()),
        ValueRef::Blob(b) => CellValue::Blob(b.to_vec()),
    }
}

// -- Unit tests --

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> QueryRunner {
        QueryRunner::with_standard_catalog().unwrap()
    }

    #[test]
    fn test_basic_select() {
        let runner = runner();
        let result = runner.execute("SELECT * FROM employees").unwrap();
        assert_eq!(result.row_count(), 10);
        assert_eq!(
            result.column_names(),
            vec!["employee_id", "employee_name", "department", "salary", "hire_date"]
        );
        assert!(!result.truncated);
    }

    #[test]
    fn test_declared_types_are_reported() {
        let runner = runner();
        let result = runner
            .execute("SELECT salary, salary * 2 AS doubled FROM employees")
            .unwrap();
        assert_eq!(result.columns[0].decl_type.as_deref(), Some("INTEGER"));
        assert_eq!(result.columns[1].decl_type, None);
    }

    #[test]
    fn test_value_types() {
        let runner = runner();
        let result = runner
            .execute("SELECT 1 AS i, 1.5 AS r, 'x' AS t, NULL AS n, x'0102' AS b")
            .unwrap();
        assert_eq!(
            result.rows[0].values,
            vec![
                CellValue::Integer(1),
                CellValue::Real(1.5),
                CellValue::Text("x".into()),
                CellValue::Null,
                CellValue::Blob(vec![1, 2]),
            ]
        );
    }

    #[test]
    fn test_engine_message_is_verbatim() {
        let runner = runner();
        let err = runner.execute("SELECT no_such_column FROM employees").unwrap_err();
        match err {
            QueryError::Execution(msg) => {
                assert!(msg.starts_with("no such column: no_such_column"), "{}", msg)
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_query_does_not_poison_runner() {
        let runner = runner();
        assert!(matches!(
            runner.execute("SELEKT * FORM employees"),
            Err(QueryError::Execution(_))
        ));
        assert!(matches!(
            runner.execute("SELECT ROW_NUMBER() OVER (PARTITION BY) FROM employees"),
            Err(QueryError::Execution(_))
        ));
        assert_eq!(runner.execute("SELECT COUNT(*) FROM sales").unwrap().row_count(), 1);
    }

    #[test]
    fn test_query_only_cannot_be_disabled() {
        let runner = runner();
        assert!(matches!(
            runner.execute("PRAGMA query_only = 0"),
            Err(QueryError::Execution(_))
        ));
        assert!(runner.execute("DELETE FROM employees").is_err());
        let flag = runner.execute("PRAGMA query_only").unwrap();
        assert_eq!(flag.rows[0].values[0], CellValue::Integer(1));
        assert_eq!(runner.tables().unwrap()[0].columns.len(), 5);
    }

    #[test]
    fn test_attach_is_refused() {
        let runner = runner();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("attached.db");

        let err = runner
            .execute(&format!("ATTACH '{}' AS x", path.display()))
            .unwrap_err();
        assert!(matches!(err, QueryError::Execution(_)), "{:?}", err);
        assert!(!path.exists());

        assert!(matches!(
            runner.execute("ATTACH ':memory:' AS scratch"),
            Err(QueryError::Execution(_))
        ));
        assert!(matches!(
            runner.execute("DETACH main"),
            Err(QueryError::Execution(_))
        ));

        let databases = runner.execute("PRAGMA database_list").unwrap();
        assert_eq!(databases.row_count(), 1);
    }

    #[test]
    fn test_deadline_excludes_time_waiting_for_connection() {
        let catalog = SampleCatalog::standard().unwrap();
        let runner = QueryRunner::new(
            &catalog,
            RunnerConfig {
                query_timeout: Duration::from_millis(100),
                ..Default::default()
            },
        )
        .unwrap();

        std::thread::scope(|s| {
            // Another statement holds the connection longer than the deadline
            let guard = runner.conn.lock();
            let waiter = s.spawn(|| {
                runner.execute(
                    "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 1000) \
                     SELECT SUM(x) AS total FROM c",
                )
            });
            std::thread::sleep(Duration::from_millis(250));
            drop(guard);

            let result = waiter.join().unwrap().unwrap();
            assert_eq!(result.value(0, "total"), Some(&CellValue::Integer(500_500)));
            assert!(result.elapsed_ms < 100.0, "{}", result.elapsed_ms);
        });
    }

    #[test]
    fn test_empty_query() {
        let runner = runner();
        assert!(matches!(runner.execute(""), Err(QueryError::EmptyQuery)));
        assert!(matches!(runner.execute("  \n -- just a comment"), Err(QueryError::EmptyQuery)));
    }

    #[test]
    fn test_multiple_statements_rejected() {
        let runner = runner();
        assert!(matches!(
            runner.execute("SELECT 1; SELECT 2"),
            Err(QueryError::MultipleStatements(2))
        ));
    }

    #[test]
    fn test_writes_are_rejected_by_engine() {
        let runner = runner();
        for sql in [
            "DELETE FROM employees",
            "INSERT INTO sales (sale_id) VALUES (99)",
            "UPDATE orders SET order_amount = 0",
            "DROP TABLE performance",
            "CREATE TABLE scratch (x INTEGER)",
        ] {
            let err = runner.execute(sql).unwrap_err();
            assert!(matches!(err, QueryError::Execution(_)), "{}: {:?}", sql, err);
        }

        let result = runner.execute("SELECT COUNT(*) AS n FROM employees").unwrap();
        assert_eq!(result.value(0, "n"), Some(&CellValue::Integer(10)));
        assert_eq!(runner.tables().unwrap().len(), 4);
    }

    #[test]
    fn test_max_rows_truncates() {
        let catalog = SampleCatalog::standard().unwrap();
        let runner = QueryRunner::new(
            &catalog,
            RunnerConfig {
                max_rows: 5,
                ..Default::default()
            },
        )
        .unwrap();
        let result = runner.execute("SELECT * FROM sales").unwrap();
        assert_eq!(result.row_count(), 5);
        assert!(result.truncated);

        let result = runner.execute("SELECT * FROM sales LIMIT 5").unwrap();
        assert_eq!(result.row_count(), 5);
        assert!(!result.truncated);
    }

    #[test]
    fn test_runaway_query_times_out() {
        let catalog = SampleCatalog::standard().unwrap();
        let runner = QueryRunner::new(
            &catalog,
            RunnerConfig {
                query_timeout: Duration::from_millis(50),
                ..Default::default()
            },
        )
        .unwrap();
        let err = runner
            .execute(
                "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c) \
                 SELECT COUNT(*) FROM c",
            )
            .unwrap_err();
        assert!(matches!(err, QueryError::Timeout(50)));

        // The deadline applies per statement
        assert!(runner.execute("SELECT 1").is_ok());
    }

    #[test]
    fn test_list_tables() {
        let runner = runner();
        let tables = runner.tables().unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["employees", "sales", "orders", "performance"]);

        let sales = &tables[1];
        assert_eq!(sales.row_count, 20);
        assert_eq!(sales.columns[1].name, "sale_date");
        assert_eq!(sales.columns[1].data_type, "TIMESTAMP");
    }

    #[test]
    fn test_sqlite_master_is_queryable() {
        let runner = runner();
        let result = runner
            .execute("SELECT name FROM sqlite_master WHERE type = 'table'")
            .unwrap();
        assert_eq!(result.row_count(), 4);
    }

    #[test]
    fn test_elapsed_is_recorded() {
        let runner = runner();
        let result = runner.execute("SELECT 1").unwrap();
        assert!(result.elapsed_ms >= 0.0);
        assert!(!runner.engine_version().is_empty());
    }
}
