//! SQLWin Web - pages and JSON API for the window functions cheat sheet
//!
//! This crate provides the HTTP surface:
//! - Lesson pages that run canned queries and show their results
//! - Sample data viewer and custom query runner
//! - Quick reference and the rating widget
//! - JSON query endpoint, health and stats endpoints

pub mod error;
pub mod handlers;
pub mod lessons;
pub mod pages;
pub mod rating;
pub mod reference;
pub mod router;
pub mod templates;

pub use error::{Result, WebError};
pub use handlers::AppState;
pub use router::create_router;
