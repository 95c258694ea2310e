//! Loading the sample catalog into a SQLite connection

use crate::error::{QueryError, Result};
use rusqlite::types::{ToSqlOutput, Value};
use rusqlite::{params_from_iter, Connection, ToSql};
use sqlwin_core::{CellValue, SampleCatalog, SampleTable};
use tracing::debug;

/// Quote an identifier for SQLite
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Borrowing adapter so sample cells bind without extra copies
struct Param<'a>(&'a CellValue);

impl ToSql for Param<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.0 {
            CellValue::Null => ToSqlOutput::Owned(Value::Null),
            CellValue::Integer(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            CellValue::Real(v) => ToSqlOutput::Owned(Value::Real(*v)),
            CellValue::Text(s) => ToSqlOutput::from(s.as_str()),
            CellValue::Blob(b) => ToSqlOutput::from(b.as_slice()),
        })
    }
}

fn create_table_sql(table: &SampleTable) -> String {
    let columns = table
        .columns()
        .iter()
        .map(|c| format!("{} {}", quote_ident(c.name), c.sql_type.as_sql()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({})", quote_ident(table.name()), columns)
}

fn insert_sql(table: &SampleTable) -> String {
    let names = table
        .columns()
        .iter()
        .map(|c| quote_ident(c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=table.columns().len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table.name()),
        names,
        placeholders
    )
}

/// Create and fill every table of `catalog` in a single transaction.
///
/// Returns the number of rows inserted.
pub fn load_catalog(conn: &mut Connection, catalog: &SampleCatalog) -> Result<usize> {
    let seed_err = |e: rusqlite::Error| QueryError::Seed(e.to_string());

    let tx = conn.transaction().map_err(seed_err)?;
    let mut total = 0;
    for table in catalog.tables() {
        tx.execute(&create_table_sql(table), []).map_err(seed_err)?;
        {
            let mut stmt = tx.prepare(&insert_sql(table)).map_err(seed_err)?;
            for row in table.rows() {
                stmt.execute(params_from_iter(row.iter().map(Param)))
                    .map_err(seed_err)?;
            }
        }
        debug!(table = table.name(), rows = table.row_count(), "Seeded sample table");
        total += table.row_count();
    }
    tx.commit().map_err(seed_err)?;

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlwin_core::{ColumnDef, SqlType};

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("sales"), "\"sales\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_generated_sql() {
        let table = SampleTable::new(
            "t",
            "T",
            "",
            vec![
                ColumnDef::new("id", SqlType::Integer),
                ColumnDef::new("at", SqlType::Timestamp),
            ],
            vec![],
        )
        .unwrap();
        assert_eq!(
            create_table_sql(&table),
            "CREATE TABLE \"t\" (\"id\" INTEGER, \"at\" TIMESTAMP)"
        );
        assert_eq!(
            insert_sql(&table),
            "INSERT INTO \"t\" (\"id\", \"at\") VALUES (?1, ?2)"
        );
    }

    #[test]
    fn test_load_standard_catalog() {
        let catalog = SampleCatalog::standard().unwrap();
        let mut conn = Connection::open_in_memory().unwrap();
        let inserted = load_catalog(&mut conn, &catalog).unwrap();
        assert_eq!(inserted, 60);

        let total: i64 = conn
            .query_row("SELECT SUM(salary) FROM employees", [], |r| r.get(0))
            .unwrap();
        assert_eq!(total, 720_000);

        let kind: String = conn
            .query_row("SELECT typeof(sale_date) FROM sales LIMIT 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(kind, "text");
    }

    #[test]
    fn test_load_twice_fails_atomically() {
        let catalog = SampleCatalog::standard().unwrap();
        let mut conn = Connection::open_in_memory().unwrap();
        load_catalog(&mut conn, &catalog).unwrap();

        let err = load_catalog(&mut conn, &catalog).unwrap_err();
        assert!(matches!(err, QueryError::Seed(_)));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM employees", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 10);
    }
}
