// src/trophies/stats.rs

use std::collections::HashSet;

use crate::state::AppSnapshot;

/// Per-user viewing statistics derived from one snapshot
///
/// All lookups are permissive: a watch record pointing at a film or
/// series missing from the catalog contributes nothing. A user id absent
/// from the snapshot yields all-zero stats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserStats {
    pub watched_film_count: usize,
    pub watched_series_count: usize,
    pub total_watch_minutes: u64,
    pub unique_categories: HashSet<String>,
    pub followers_count: usize,
    /// Stub: no rating records exist in the data model yet
    pub has_rated_content: bool,
    /// Stub: watch rows carry no timestamp
    pub has_watched_at_night: bool,
    /// Stub: watch rows carry no timestamp
    pub has_watched_on_weekend: bool,
}

impl UserStats {
    /// Films plus series watched
    pub fn total_watched(&self) -> usize {
        self.watched_film_count + self.watched_series_count
    }

    /// Approximation for "completed a series": at least 5 series watched.
    /// Not verified against episode counts; kept as the product defines it.
    pub fn has_completed_series(&self) -> bool {
        self.watched_series_count >= 5
    }

    /// Derive stats for one user from a snapshot
    pub fn for_user(user_id: i64, snapshot: &AppSnapshot) -> Self {
        let mut stats = UserStats::default();

        for watched in snapshot.watched_films.iter().filter(|w| w.user_id == user_id) {
            stats.watched_film_count += 1;
            if let Some(film) = snapshot.find_film(watched.film_id) {
                stats.total_watch_minutes += u64::from(film.duration_minutes);
                stats.unique_categories.insert(film.category.clone());
            }
        }

        for watched in snapshot.watched_series.iter().filter(|w| w.user_id == user_id) {
            stats.watched_series_count += 1;
            if let Some(series) = snapshot.find_series(watched.series_id) {
                stats.total_watch_minutes += u64::from(series.duration_minutes);
                stats.unique_categories.insert(series.category.clone());
            }
        }

        stats.followers_count = snapshot
            .followers
            .iter()
            .filter(|f| f.followed_id == user_id)
            .count();

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::*;
    use std::sync::Arc;

    fn film(id: i64, minutes: u32, category: &str) -> Film {
        let mut f = Film::new(format!("Film {}", id), minutes, category);
        f.id = id;
        f
    }

    #[test]
    fn test_stats_scoped_to_user() {
        let mut snapshot = AppSnapshot::empty();
        snapshot.films = Arc::new(vec![film(1, 120, "Azione"), film(2, 90, "Comico")]);
        snapshot.watched_films = Arc::new(vec![
            WatchedFilm { user_id: 1, film_id: 1 },
            WatchedFilm { user_id: 2, film_id: 2 },
        ]);

        let stats = UserStats::for_user(1, &snapshot);
        assert_eq!(stats.watched_film_count, 1);
        assert_eq!(stats.total_watch_minutes, 120);
        assert_eq!(stats.unique_categories.len(), 1);
    }

    #[test]
    fn test_missing_catalog_entry_contributes_zero() {
        let mut snapshot = AppSnapshot::empty();
        // watch record for a film that is not in the catalog
        snapshot.watched_films = Arc::new(vec![WatchedFilm { user_id: 1, film_id: 99 }]);

        let stats = UserStats::for_user(1, &snapshot);
        assert_eq!(stats.watched_film_count, 1);
        assert_eq!(stats.total_watch_minutes, 0);
        assert!(stats.unique_categories.is_empty());
    }

    #[test]
    fn test_followers_count_is_inbound_edges() {
        let mut snapshot = AppSnapshot::empty();
        snapshot.followers = Arc::new(vec![
            Follower { follower_id: 2, followed_id: 1 },
            Follower { follower_id: 3, followed_id: 1 },
            Follower { follower_id: 1, followed_id: 2 },
        ]);

        let stats = UserStats::for_user(1, &snapshot);
        assert_eq!(stats.followers_count, 2);
    }

    #[test]
    fn test_stub_predicates_stay_false() {
        let snapshot = AppSnapshot::empty();
        let stats = UserStats::for_user(1, &snapshot);
        assert!(!stats.has_rated_content);
        assert!(!stats.has_watched_at_night);
        assert!(!stats.has_watched_on_weekend);
    }
}
