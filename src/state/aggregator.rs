// src/state/aggregator.rs
//
// Combine-latest over all collection sources.
//
// CRITICAL RULES:
// - A snapshot is emitted only when every source has published at least
//   once; until then the combination stalls (no partial snapshots)
// - Each source is read exactly once per combination step
// - Runs as a background task; never blocks callers

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::state::snapshot::AppSnapshot;
use crate::state::source::SourceSet;

pub struct StateAggregator {
    sources: SourceSet,
    out: watch::Sender<Option<Arc<AppSnapshot>>>,
}

impl StateAggregator {
    pub fn new(sources: SourceSet) -> Self {
        let (out, _rx) = watch::channel(None);
        Self { sources, out }
    }

    /// Stream of combined snapshots for UI-side consumers
    ///
    /// The receiver holds `None` until the first complete combination.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<AppSnapshot>>> {
        self.out.subscribe()
    }

    /// Combine the latest source values right now
    ///
    /// Used by the evaluate-then-apply path, which needs a snapshot that
    /// already reflects the write it just performed (sources publish
    /// synchronously on write; only the output stream is asynchronous).
    pub fn current(&self) -> Option<Arc<AppSnapshot>> {
        self.combine().map(Arc::new)
    }

    /// Last snapshot pushed to the output stream, if any
    pub fn latest_emitted(&self) -> Option<Arc<AppSnapshot>> {
        self.out.borrow().clone()
    }

    fn combine(&self) -> Option<AppSnapshot> {
        let s = &self.sources;
        Some(AppSnapshot {
            films: s.films.latest()?,
            watched_films: s.watched_films.latest()?,
            film_requests: s.film_requests.latest()?,
            series: s.series.latest()?,
            watched_series: s.watched_series.latest()?,
            series_requests: s.series_requests.latest()?,
            users: s.users.latest()?,
            trophies: s.trophies.latest()?,
            achievements: s.achievements.latest()?,
            notifications: s.notifications.latest()?,
            notification_deliveries: s.notification_deliveries.latest()?,
            followers: s.followers.latest()?,
            cinemas: s.cinemas.latest()?,
            nearby_cinemas: s.nearby_cinemas.latest()?,
            actors: s.actors.latest()?,
            film_actors: s.film_actors.latest()?,
            series_actors: s.series_actors.latest()?,
            platforms: s.platforms.latest()?,
            film_platforms: s.film_platforms.latest()?,
            series_platforms: s.series_platforms.latest()?,
        })
    }

    /// Start the background combination task
    ///
    /// Every source tick triggers a recombination; incomplete combinations
    /// are skipped silently (stall, not crash). The task runs until the
    /// handle is aborted.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                self.sources.changed().await;
                match self.combine() {
                    Some(snapshot) => {
                        self.out.send_replace(Some(Arc::new(snapshot)));
                    }
                    None => {
                        log::debug!("aggregation stalled: not all sources have published");
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::*;

    fn publish_all_empty(sources: &SourceSet) {
        sources.films.publish(Vec::new());
        sources.watched_films.publish(Vec::new());
        sources.film_requests.publish(Vec::new());
        sources.series.publish(Vec::new());
        sources.watched_series.publish(Vec::new());
        sources.series_requests.publish(Vec::new());
        sources.users.publish(Vec::new());
        sources.trophies.publish(Vec::new());
        sources.achievements.publish(Vec::new());
        sources.notifications.publish(Vec::new());
        sources.notification_deliveries.publish(Vec::new());
        sources.followers.publish(Vec::new());
        sources.cinemas.publish(Vec::new());
        sources.nearby_cinemas.publish(Vec::new());
        sources.actors.publish(Vec::new());
        sources.film_actors.publish(Vec::new());
        sources.series_actors.publish(Vec::new());
        sources.platforms.publish(Vec::new());
        sources.film_platforms.publish(Vec::new());
        sources.series_platforms.publish(Vec::new());
    }

    #[test]
    fn test_stalls_until_every_source_published() {
        let sources = SourceSet::new();
        let aggregator = StateAggregator::new(sources.clone());

        sources.films.publish(vec![Film::new("A", 100, "Drammatico")]);
        assert!(aggregator.current().is_none());

        publish_all_empty(&sources);
        // films was re-published empty above; publish a real value again
        sources.films.publish(vec![Film::new("A", 100, "Drammatico")]);

        let snapshot = aggregator.current().expect("all sources published");
        assert_eq!(snapshot.films.len(), 1);
        assert!(snapshot.users.is_empty());
    }

    #[test]
    fn test_snapshot_keeps_latest_value_per_source() {
        let sources = SourceSet::new();
        let aggregator = StateAggregator::new(sources.clone());
        publish_all_empty(&sources);

        sources.users.publish(vec![User::new("mario")]);
        let first = aggregator.current().unwrap();

        sources.users.publish(vec![User::new("mario"), User::new("luigi")]);
        let second = aggregator.current().unwrap();

        // Earlier snapshot is immutable; later snapshot sees the update
        assert_eq!(first.users.len(), 1);
        assert_eq!(second.users.len(), 2);
        // Untouched sources carry over their previous value
        assert!(second.films.is_empty());
    }

    #[tokio::test]
    async fn test_background_task_emits_on_tick() {
        let sources = SourceSet::new();
        let aggregator = Arc::new(StateAggregator::new(sources.clone()));
        let mut rx = aggregator.subscribe();
        let handle = Arc::clone(&aggregator).spawn();

        publish_all_empty(&sources);
        sources.films.publish(vec![Film::new("A", 100, "Drammatico")]);

        // Wait for an emission carrying the film
        loop {
            rx.changed().await.unwrap();
            let snap = rx.borrow().clone();
            if let Some(snap) = snap {
                if snap.films.len() == 1 {
                    break;
                }
            }
        }

        handle.abort();
    }
}
