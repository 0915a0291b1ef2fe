// src/state/source.rs

use std::sync::Arc;
use tokio::sync::{watch, Notify};

use crate::domain::*;

/// A replace-whole-collection stream for one table
///
/// Holds the latest full contents of the table, or `None` if the table has
/// never been published. Cloning shares the underlying channel, so the
/// repository's handle and the aggregator's handle see the same value.
pub struct CollectionSource<T> {
    tx: Arc<watch::Sender<Option<Arc<Vec<T>>>>>,
    tick: Arc<Notify>,
}

impl<T> Clone for CollectionSource<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
            tick: Arc::clone(&self.tick),
        }
    }
}

impl<T> CollectionSource<T> {
    fn new(tick: Arc<Notify>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            tick,
        }
    }

    /// Replace the collection with a fresh full read of the table
    ///
    /// Wakes the aggregator. Publishing is a single atomic swap, so a
    /// combination step can never observe a half-updated collection.
    pub fn publish(&self, rows: Vec<T>) {
        self.tx.send_replace(Some(Arc::new(rows)));
        self.tick.notify_one();
    }

    /// Latest published collection, or `None` if never published
    pub fn latest(&self) -> Option<Arc<Vec<T>>> {
        self.tx.borrow().clone()
    }
}

/// One source per persisted table
///
/// Created once at wiring time; repositories receive clones of the sources
/// they own and the aggregator keeps the set to combine from.
#[derive(Clone)]
pub struct SourceSet {
    pub films: CollectionSource<Film>,
    pub watched_films: CollectionSource<WatchedFilm>,
    pub film_requests: CollectionSource<FilmRequest>,
    pub series: CollectionSource<Series>,
    pub watched_series: CollectionSource<WatchedSeries>,
    pub series_requests: CollectionSource<SeriesRequest>,
    pub users: CollectionSource<User>,
    pub trophies: CollectionSource<Trophy>,
    pub achievements: CollectionSource<Achievement>,
    pub notifications: CollectionSource<Notification>,
    pub notification_deliveries: CollectionSource<NotificationDelivery>,
    pub followers: CollectionSource<Follower>,
    pub cinemas: CollectionSource<Cinema>,
    pub nearby_cinemas: CollectionSource<NearbyCinema>,
    pub actors: CollectionSource<Actor>,
    pub film_actors: CollectionSource<FilmActor>,
    pub series_actors: CollectionSource<SeriesActor>,
    pub platforms: CollectionSource<Platform>,
    pub film_platforms: CollectionSource<FilmPlatform>,
    pub series_platforms: CollectionSource<SeriesPlatform>,

    tick: Arc<Notify>,
}

impl SourceSet {
    pub fn new() -> Self {
        let tick = Arc::new(Notify::new());
        Self {
            films: CollectionSource::new(Arc::clone(&tick)),
            watched_films: CollectionSource::new(Arc::clone(&tick)),
            film_requests: CollectionSource::new(Arc::clone(&tick)),
            series: CollectionSource::new(Arc::clone(&tick)),
            watched_series: CollectionSource::new(Arc::clone(&tick)),
            series_requests: CollectionSource::new(Arc::clone(&tick)),
            users: CollectionSource::new(Arc::clone(&tick)),
            trophies: CollectionSource::new(Arc::clone(&tick)),
            achievements: CollectionSource::new(Arc::clone(&tick)),
            notifications: CollectionSource::new(Arc::clone(&tick)),
            notification_deliveries: CollectionSource::new(Arc::clone(&tick)),
            followers: CollectionSource::new(Arc::clone(&tick)),
            cinemas: CollectionSource::new(Arc::clone(&tick)),
            nearby_cinemas: CollectionSource::new(Arc::clone(&tick)),
            actors: CollectionSource::new(Arc::clone(&tick)),
            film_actors: CollectionSource::new(Arc::clone(&tick)),
            series_actors: CollectionSource::new(Arc::clone(&tick)),
            platforms: CollectionSource::new(Arc::clone(&tick)),
            film_platforms: CollectionSource::new(Arc::clone(&tick)),
            series_platforms: CollectionSource::new(Arc::clone(&tick)),
            tick,
        }
    }

    /// Wait until any source publishes
    pub(crate) async fn changed(&self) {
        self.tick.notified().await;
    }
}

impl Default for SourceSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_starts_unpublished() {
        let sources = SourceSet::new();
        assert!(sources.films.latest().is_none());
    }

    #[test]
    fn test_publish_replaces_whole_collection() {
        let sources = SourceSet::new();
        sources.films.publish(vec![Film::new("A", 100, "Drammatico")]);
        sources.films.publish(vec![
            Film::new("A", 100, "Drammatico"),
            Film::new("B", 90, "Comico"),
        ]);

        let latest = sources.films.latest().unwrap();
        assert_eq!(latest.len(), 2);
    }

    #[test]
    fn test_clone_shares_channel() {
        let sources = SourceSet::new();
        let handle = sources.users.clone();
        handle.publish(vec![User::new("mario")]);
        assert_eq!(sources.users.latest().unwrap().len(), 1);
    }
}
