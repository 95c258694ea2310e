//! SQLWin Engine - Query runner for the window functions cheat sheet
//!
//! This crate wraps an embedded SQLite database:
//! - Seeding the read-only sample tables
//! - Statement inspection (empty and multi-statement input)
//! - Query execution with row cap and deadline
//! - Schema listing for the table reference

pub mod error;
pub mod runner;
pub mod seed;
pub mod statement;

pub use error::{QueryError, Result};
pub use runner::{QueryRunner, RunnerConfig, TableColumn, TableInfo};
