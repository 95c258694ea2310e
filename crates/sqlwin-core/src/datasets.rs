//! Fixed sample tables used by every lesson
//!
//! The four tables are built once at startup and never mutated. Timestamps are
//! stored as `YYYY-MM-DD HH:MM:SS` text, which is how SQLite keeps datetimes.

use crate::error::{CoreError, Result};
use crate::types::{CellValue, Column, ResultSet, Row};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Declared column type of a sample table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlType {
    Integer,
    Text,
    Timestamp,
}

impl SqlType {
    /// Type name used in `CREATE TABLE`
    pub fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Text => "TEXT",
            SqlType::Timestamp => "TIMESTAMP",
        }
    }

    /// Friendlier label for the table reference panels
    pub fn label(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Text => "TEXT",
            SqlType::Timestamp => "DATETIME",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
}

impl ColumnDef {
    pub const fn new(name: &'static str, sql_type: SqlType) -> Self {
        Self { name, sql_type }
    }
}

/// One immutable sample table
#[derive(Debug, Clone)]
pub struct SampleTable {
    name: &'static str,
    title: &'static str,
    summary: &'static str,
    columns: Vec<ColumnDef>,
    rows: Vec<Vec<CellValue>>,
}

impl SampleTable {
    /// Build a table, checking that every row matches the column list
    pub fn new(
        name: &'static str,
        title: &'static str,
        summary: &'static str,
        columns: Vec<ColumnDef>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self> {
        if columns.is_empty() {
            return Err(CoreError::NoColumns(name.to_string()));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(CoreError::ShapeMismatch {
                    table: name.to_string(),
                    row: i,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Self {
            name,
            title,
            summary,
            columns,
            rows,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn summary(&self) -> &'static str {
        self.summary
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Comma separated column names, e.g. for the sidebar table list
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The table as a result set, for display without an engine round trip
    pub fn to_result_set(&self) -> ResultSet {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::with_type(c.name, c.sql_type.as_sql()))
            .collect();
        let rows = self.rows.iter().map(|r| Row::new(r.clone())).collect();
        ResultSet::new(columns, rows)
    }
}

/// The full set of sample tables, in display order
#[derive(Debug, Clone)]
pub struct SampleCatalog {
    tables: Vec<SampleTable>,
}

impl SampleCatalog {
    /// Build a catalog from tables; names must be unique (case-insensitive)
    pub fn new(tables: Vec<SampleTable>) -> Result<Self> {
        for (i, t) in tables.iter().enumerate() {
            if tables[..i].iter().any(|o| o.name.eq_ignore_ascii_case(t.name)) {
                return Err(CoreError::DuplicateTable(t.name.to_string()));
            }
        }
        Ok(Self { tables })
    }

    /// employees, sales, orders and performance
    pub fn standard() -> Result<Self> {
        Self::new(vec![employees()?, sales()?, orders()?, performance()?])
    }

    pub fn tables(&self) -> &[SampleTable] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&SampleTable> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| CoreError::InvalidDate(format!("{}-{:02}-{:02}", year, month, day)))
}

fn midnight(d: NaiveDate) -> Result<NaiveDateTime> {
    d.and_hms_opt(0, 0, 0)
        .ok_or_else(|| CoreError::InvalidDate(d.to_string()))
}

fn timestamp(dt: NaiveDateTime) -> CellValue {
    CellValue::Text(dt.format(TIMESTAMP_FORMAT).to_string())
}

fn employees() -> Result<SampleTable> {
    const NAMES: [&str; 10] = [
        "Alice", "Bob", "Charlie", "Diana", "Eve", "Frank", "Grace", "Henry", "Iris", "Jack",
    ];
    const DEPARTMENTS: [&str; 10] = [
        "Sales", "Sales", "Sales", "IT", "IT", "IT", "HR", "HR", "Finance", "Finance",
    ];
    const SALARIES: [i64; 10] = [
        60000, 75000, 55000, 85000, 90000, 80000, 65000, 70000, 72000, 68000,
    ];
    const HIRE_DATES: [&str; 10] = [
        "2020-01-15", "2019-03-20", "2021-06-10", "2018-02-01", "2017-08-15",
        "2019-11-30", "2020-05-10", "2021-02-20", "2019-04-15", "2022-01-10",
    ];

    let rows = (0..NAMES.len())
        .map(|i| {
            vec![
                CellValue::Integer(i as i64 + 1),
                NAMES[i].into(),
                DEPARTMENTS[i].into(),
                SALARIES[i].into(),
                HIRE_DATES[i].into(),
            ]
        })
        .collect();

    SampleTable::new(
        "employees",
        "Employees",
        "10 employees across 4 departments with various salary levels",
        vec![
            ColumnDef::new("employee_id", SqlType::Integer),
            ColumnDef::new("employee_name", SqlType::Text),
            ColumnDef::new("department", SqlType::Text),
            ColumnDef::new("salary", SqlType::Integer),
            ColumnDef::new("hire_date", SqlType::Text),
        ],
        rows,
    )
}

fn sales() -> Result<SampleTable> {
    const PRODUCTS: [&str; 20] = [
        "A", "B", "A", "C", "B", "A", "C", "B", "A", "C", "B", "A", "C", "B", "A", "C", "B", "A",
        "C", "B",
    ];
    const AMOUNTS: [i64; 20] = [
        100, 150, 120, 200, 180, 140, 220, 160, 130, 210, 190, 150, 230, 170, 140, 250, 200, 160,
        240, 210,
    ];
    const REGIONS: [&str; 20] = [
        "North", "South", "North", "South", "East", "West", "East", "West", "North", "South",
        "North", "South", "East", "West", "East", "West", "North", "South", "North", "South",
    ];

    let start = midnight(date(2024, 1, 1)?)?;
    let rows = (0..PRODUCTS.len())
        .map(|i| {
            vec![
                CellValue::Integer(i as i64 + 1),
                timestamp(start + Duration::days(2 * i as i64)),
                PRODUCTS[i].into(),
                AMOUNTS[i].into(),
                REGIONS[i].into(),
            ]
        })
        .collect();

    SampleTable::new(
        "sales",
        "Sales",
        "20 sales transactions across 3 products and 4 regions",
        vec![
            ColumnDef::new("sale_id", SqlType::Integer),
            ColumnDef::new("sale_date", SqlType::Timestamp),
            ColumnDef::new("product", SqlType::Text),
            ColumnDef::new("amount", SqlType::Integer),
            ColumnDef::new("region", SqlType::Text),
        ],
        rows,
    )
}

fn orders() -> Result<SampleTable> {
    const CUSTOMERS: [(i64, &str); 20] = [
        (1, "John"), (1, "John"), (1, "John"),
        (2, "Jane"), (2, "Jane"), (2, "Jane"),
        (3, "Mike"), (3, "Mike"),
        (4, "Sarah"), (4, "Sarah"),
        (5, "Tom"), (5, "Tom"), (5, "Tom"),
        (6, "Alice"), (6, "Alice"),
        (7, "Bob"), (7, "Bob"),
        (8, "Carol"), (8, "Carol"),
        (9, "David"),
    ];
    const AMOUNTS: [i64; 20] = [
        100, 250, 150, 200, 300, 250, 120, 180, 90, 140, 250, 200, 180, 160, 220, 140, 190, 230,
        200, 150,
    ];

    let mut rows = Vec::with_capacity(CUSTOMERS.len());
    for (i, (customer_id, customer_name)) in CUSTOMERS.iter().enumerate() {
        // Odd days of January, spilling into February once past the 31st
        let day = 2 * i as u32 + 1;
        let order_date = if day <= 31 {
            date(2024, 1, day)?
        } else {
            date(2024, 2, day % 31)?
        };
        rows.push(vec![
            CellValue::Integer(i as i64 + 1),
            CellValue::Integer(*customer_id),
            (*customer_name).into(),
            timestamp(midnight(order_date)?),
            AMOUNTS[i].into(),
        ]);
    }

    SampleTable::new(
        "orders",
        "Orders",
        "20 orders from 9 customers at different dates",
        vec![
            ColumnDef::new("order_id", SqlType::Integer),
            ColumnDef::new("customer_id", SqlType::Integer),
            ColumnDef::new("customer_name", SqlType::Text),
            ColumnDef::new("order_date", SqlType::Timestamp),
            ColumnDef::new("order_amount", SqlType::Integer),
        ],
        rows,
    )
}

fn performance() -> Result<SampleTable> {
    const REVENUE: [i64; 10] = [5000, 7500, 4500, 8500, 9000, 6000, 8000, 5500, 9500, 7000];
    const TARGET: [i64; 10] = [5000, 6000, 5000, 8000, 8500, 5000, 6000, 5000, 8000, 8500];

    let rows = (0..REVENUE.len())
        .map(|i| {
            let month = if i < 5 { "Jan 2024" } else { "Feb 2024" };
            vec![
                CellValue::Integer(i as i64 + 1),
                month.into(),
                REVENUE[i].into(),
                TARGET[i].into(),
            ]
        })
        .collect();

    SampleTable::new(
        "performance",
        "Performance",
        "Monthly performance metrics comparing revenue vs target",
        vec![
            ColumnDef::new("employee_id", SqlType::Integer),
            ColumnDef::new("month", SqlType::Text),
            ColumnDef::new("revenue", SqlType::Integer),
            ColumnDef::new("target", SqlType::Integer),
        ],
        rows,
    )
}
