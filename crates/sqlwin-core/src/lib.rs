//! SQLWin Core - Core types for the window functions cheat sheet
//!
//! This crate provides the data types shared by the engine and the web layer:
//! - `CellValue`: A single typed value produced by the SQL engine
//! - `Column`: Result column name with its declared type
//! - `Row`: One result row, in column order
//! - `ResultSet`: A rectangular query result
//! - `SampleTable` / `SampleCatalog`: The fixed, read-only sample datasets

pub mod datasets;
pub mod error;
pub mod types;

pub use datasets::{ColumnDef, SampleCatalog, SampleTable, SqlType};
pub use error::{CoreError, Result};
pub use types::*;
