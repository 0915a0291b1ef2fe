// src/state/snapshot.rs

use std::sync::Arc;

use crate::domain::*;

/// Point-in-time-consistent view of every persisted collection
///
/// Built by the aggregator from the latest value of each source. Each
/// field is read from its source exactly once per combination step, so a
/// snapshot can mix a fresh collection from one table with an older one
/// from another, but never two disagreeing reads of the same table.
///
/// The current user id is deliberately NOT part of the snapshot; it is
/// session state and lives in `SessionContext`.
#[derive(Debug, Clone)]
pub struct AppSnapshot {
    pub films: Arc<Vec<Film>>,
    pub watched_films: Arc<Vec<WatchedFilm>>,
    pub film_requests: Arc<Vec<FilmRequest>>,
    pub series: Arc<Vec<Series>>,
    pub watched_series: Arc<Vec<WatchedSeries>>,
    pub series_requests: Arc<Vec<SeriesRequest>>,
    pub users: Arc<Vec<User>>,
    pub trophies: Arc<Vec<Trophy>>,
    pub achievements: Arc<Vec<Achievement>>,
    pub notifications: Arc<Vec<Notification>>,
    pub notification_deliveries: Arc<Vec<NotificationDelivery>>,
    pub followers: Arc<Vec<Follower>>,
    pub cinemas: Arc<Vec<Cinema>>,
    pub nearby_cinemas: Arc<Vec<NearbyCinema>>,
    pub actors: Arc<Vec<Actor>>,
    pub film_actors: Arc<Vec<FilmActor>>,
    pub series_actors: Arc<Vec<SeriesActor>>,
    pub platforms: Arc<Vec<Platform>>,
    pub film_platforms: Arc<Vec<FilmPlatform>>,
    pub series_platforms: Arc<Vec<SeriesPlatform>>,
}

impl AppSnapshot {
    /// Permissive lookup: absent ids resolve to `None`, never an error
    pub fn find_user(&self, user_id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    pub fn find_film(&self, film_id: i64) -> Option<&Film> {
        self.films.iter().find(|f| f.id == film_id)
    }

    pub fn find_series(&self, series_id: i64) -> Option<&Series> {
        self.series.iter().find(|s| s.id == series_id)
    }

    pub fn find_trophy(&self, trophy_id: i64) -> Option<&Trophy> {
        self.trophies.iter().find(|t| t.id == trophy_id)
    }

    /// An empty snapshot, useful as a test fixture
    pub fn empty() -> Self {
        Self {
            films: Arc::new(Vec::new()),
            watched_films: Arc::new(Vec::new()),
            film_requests: Arc::new(Vec::new()),
            series: Arc::new(Vec::new()),
            watched_series: Arc::new(Vec::new()),
            series_requests: Arc::new(Vec::new()),
            users: Arc::new(Vec::new()),
            trophies: Arc::new(Vec::new()),
            achievements: Arc::new(Vec::new()),
            notifications: Arc::new(Vec::new()),
            notification_deliveries: Arc::new(Vec::new()),
            followers: Arc::new(Vec::new()),
            cinemas: Arc::new(Vec::new()),
            nearby_cinemas: Arc::new(Vec::new()),
            actors: Arc::new(Vec::new()),
            film_actors: Arc::new(Vec::new()),
            series_actors: Arc::new(Vec::new()),
            platforms: Arc::new(Vec::new()),
            film_platforms: Arc::new(Vec::new()),
            series_platforms: Arc::new(Vec::new()),
        }
    }
}
