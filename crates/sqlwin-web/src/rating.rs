//! App rating counters
//!
//! A vote is remembered per browser through the [`RATED_COOKIE`] cookie; the
//! counts themselves are process-wide and reset on restart.

use axum::http::{header, HeaderMap};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Cookie set once a browser has voted
pub const RATED_COOKIE: &str = "sqlwin_rated";

/// One year
const COOKIE_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Love,
    Like,
    Smile,
}

impl Reaction {
    pub fn all() -> &'static [Reaction] {
        &[Reaction::Love, Reaction::Like, Reaction::Smile]
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Reaction::Love => "love",
            Reaction::Like => "like",
            Reaction::Smile => "smile",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Reaction> {
        Reaction::all().iter().copied().find(|r| r.slug() == slug)
    }

    /// Button caption
    pub fn label(&self) -> &'static str {
        match self {
            Reaction::Love => "❤️ Love",
            Reaction::Like => "👍 Like",
            Reaction::Smile => "😊 Smile",
        }
    }

    /// Metric caption
    pub fn metric_label(&self) -> &'static str {
        match self {
            Reaction::Love => "❤️ Loves",
            Reaction::Like => "👍 Likes",
            Reaction::Smile => "😊 Smiles",
        }
    }
}

/// Snapshot of the vote counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RatingCounts {
    pub loves: u64,
    pub likes: u64,
    pub smiles: u64,
}

impl RatingCounts {
    pub fn get(&self, reaction: Reaction) -> u64 {
        match reaction {
            Reaction::Love => self.loves,
            Reaction::Like => self.likes,
            Reaction::Smile => self.smiles,
        }
    }

    pub fn total(&self) -> u64 {
        self.loves + self.likes + self.smiles
    }
}

#[derive(Debug, Default)]
pub struct RatingBoard {
    loves: AtomicU64,
    likes: AtomicU64,
    smiles: AtomicU64,
}

impl RatingBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, reaction: Reaction) -> &AtomicU64 {
        match reaction {
            Reaction::Love => &self.loves,
            Reaction::Like => &self.likes,
            Reaction::Smile => &self.smiles,
        }
    }

    /// Count a vote and return the new total for that reaction
    pub fn record(&self, reaction: Reaction) -> u64 {
        self.counter(reaction).fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn snapshot(&self) -> RatingCounts {
        RatingCounts {
            loves: self.loves.load(Ordering::Relaxed),
            likes: self.likes.load(Ordering::Relaxed),
            smiles: self.smiles.load(Ordering::Relaxed),
        }
    }
}

/// Whether the request carries the voted cookie
pub fn has_voted(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, _)| name == RATED_COOKIE)
}

/// `Set-Cookie` value recording a vote
pub fn rated_cookie() -> String {
    format!(
        "{}=1; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        RATED_COOKIE, COOKIE_MAX_AGE_SECS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_record_and_snapshot() {
        let board = RatingBoard::new();
        assert_eq!(board.record(Reaction::Love), 1);
        assert_eq!(board.record(Reaction::Love), 2);
        assert_eq!(board.record(Reaction::Smile), 1);

        let counts = board.snapshot();
        assert_eq!(counts, RatingCounts { loves: 2, likes: 0, smiles: 1 });
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.get(Reaction::Like), 0);
    }

    #[test]
    fn test_reaction_slugs() {
        for reaction in Reaction::all() {
            assert_eq!(Reaction::from_slug(reaction.slug()), Some(*reaction));
        }
        assert_eq!(Reaction::from_slug("meh"), None);
    }

    #[test]
    fn test_has_voted() {
        let mut headers = HeaderMap::new();
        assert!(!has_voted(&headers));

        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; other=1"));
        assert!(!has_voted(&headers));

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; sqlwin_rated=1"),
        );
        assert!(has_voted(&headers));
    }

    #[test]
    fn test_cookie_value_round_trips() {
        let cookie = rated_cookie();
        let pair = cookie.split(';').next().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
        assert!(has_voted(&headers));
    }
}
