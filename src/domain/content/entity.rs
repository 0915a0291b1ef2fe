use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discriminates film vs. series where an operation applies to both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Film,
    Series,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Film => write!(f, "film"),
            ContentKind::Series => write!(f, "series"),
        }
    }
}

/// A film catalog entry
///
/// `visible` is false while the film is pending request approval; only
/// visible content is shown to regular users. `views` and `stars` are
/// mutated by watch tracking and rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    /// Assigned by the database on insert; 0 means "not yet persisted"
    pub id: i64,
    pub title: String,
    pub cast_count: u32,
    pub description: String,
    pub release_date: Option<DateTime<Utc>>,
    pub duration_minutes: u32,
    pub category: String,
    pub visible: bool,
    pub views: u32,
    pub stars: i32,
}

impl Film {
    pub fn new(title: impl Into<String>, duration_minutes: u32, category: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            cast_count: 0,
            description: String::new(),
            release_date: None,
            duration_minutes,
            category: category.into(),
            visible: true,
            views: 0,
            stars: 0,
        }
    }
}

/// A TV series catalog entry
///
/// Same shape as `Film`; `duration_minutes` is the per-entry runtime the
/// catalog records, counted as-is toward total watch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: i64,
    pub title: String,
    pub cast_count: u32,
    pub description: String,
    pub release_date: Option<DateTime<Utc>>,
    pub duration_minutes: u32,
    pub category: String,
    pub visible: bool,
    pub views: u32,
    pub stars: i32,
}

impl Series {
    pub fn new(title: impl Into<String>, duration_minutes: u32, category: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            cast_count: 0,
            description: String::new(),
            release_date: None,
            duration_minutes,
            category: category.into(),
            visible: true,
            views: 0,
            stars: 0,
        }
    }
}
