// src/domain/watch.rs
//
// Watch history rows. Existence is the only signal: no timestamp of the
// viewing event is persisted, which is why the time-based trophy
// predicates cannot currently unlock (see trophies::stats).

use serde::{Deserialize, Serialize};

/// Records that a user has seen a film
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedFilm {
    pub user_id: i64,
    pub film_id: i64,
}

/// Records that a user has seen a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedSeries {
    pub user_id: i64,
    pub series_id: i64,
}
