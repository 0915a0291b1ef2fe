use serde::{Deserialize, Serialize};

/// A registered user
///
/// The watch-list fields mirror the watch history tables and are kept in
/// sync by the watch service; they exist so a user row alone is enough to
/// render a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub residence: String,
    pub is_admin: bool,
    pub watched_films: Vec<i64>,
    pub watched_series: Vec<i64>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: 0,
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            password: String::new(),
            residence: String::new(),
            is_admin: false,
            watched_films: Vec::new(),
            watched_series: Vec::new(),
        }
    }

    pub fn has_watched_film(&self, film_id: i64) -> bool {
        self.watched_films.contains(&film_id)
    }

    pub fn has_watched_series(&self, series_id: i64) -> bool {
        self.watched_series.contains(&series_id)
    }
}
