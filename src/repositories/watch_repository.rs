// src/repositories/watch_repository.rs
//
// Watch history persistence for films and series. Rows are
// existence-only; INSERT OR IGNORE makes marking idempotent.

use rusqlite::params;
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::{WatchedFilm, WatchedSeries};
use crate::error::AppResult;
use crate::state::CollectionSource;

pub trait WatchHistoryRepository: Send + Sync {
    /// Returns true if a row was actually inserted
    fn mark_film(&self, user_id: i64, film_id: i64) -> AppResult<bool>;
    fn unmark_film(&self, user_id: i64, film_id: i64) -> AppResult<bool>;
    fn list_watched_films(&self) -> AppResult<Vec<WatchedFilm>>;

    fn mark_series(&self, user_id: i64, series_id: i64) -> AppResult<bool>;
    fn unmark_series(&self, user_id: i64, series_id: i64) -> AppResult<bool>;
    fn list_watched_series(&self) -> AppResult<Vec<WatchedSeries>>;

    fn refresh(&self) -> AppResult<()>;
}

pub struct SqliteWatchHistoryRepository {
    pool: Arc<ConnectionPool>,
    film_source: CollectionSource<WatchedFilm>,
    series_source: CollectionSource<WatchedSeries>,
}

impl SqliteWatchHistoryRepository {
    pub fn new(
        pool: Arc<ConnectionPool>,
        film_source: CollectionSource<WatchedFilm>,
        series_source: CollectionSource<WatchedSeries>,
    ) -> Self {
        Self {
            pool,
            film_source,
            series_source,
        }
    }

    fn republish_films(&self) -> AppResult<()> {
        self.film_source.publish(self.list_watched_films()?);
        Ok(())
    }

    fn republish_series(&self) -> AppResult<()> {
        self.series_source.publish(self.list_watched_series()?);
        Ok(())
    }
}

impl WatchHistoryRepository for SqliteWatchHistoryRepository {
    fn mark_film(&self, user_id: i64, film_id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO film_watched (user_id, film_id) VALUES (?1, ?2)",
            params![user_id, film_id],
        )? > 0;
        drop(conn);

        self.republish_films()?;
        Ok(inserted)
    }

    fn unmark_film(&self, user_id: i64, film_id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let removed = conn.execute(
            "DELETE FROM film_watched WHERE user_id = ?1 AND film_id = ?2",
            params![user_id, film_id],
        )? > 0;
        drop(conn);

        self.republish_films()?;
        Ok(removed)
    }

    fn list_watched_films(&self) -> AppResult<Vec<WatchedFilm>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare("SELECT user_id, film_id FROM film_watched ORDER BY user_id, film_id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(WatchedFilm {
                    user_id: row.get(0)?,
                    film_id: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn mark_series(&self, user_id: i64, series_id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO series_watched (user_id, series_id) VALUES (?1, ?2)",
            params![user_id, series_id],
        )? > 0;
        drop(conn);

        self.republish_series()?;
        Ok(inserted)
    }

    fn unmark_series(&self, user_id: i64, series_id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let removed = conn.execute(
            "DELETE FROM series_watched WHERE user_id = ?1 AND series_id = ?2",
            params![user_id, series_id],
        )? > 0;
        drop(conn);

        self.republish_series()?;
        Ok(removed)
    }

    fn list_watched_series(&self) -> AppResult<Vec<WatchedSeries>> {
        let conn = self.pool.get()?;

        let mut stmt = conn
            .prepare("SELECT user_id, series_id FROM series_watched ORDER BY user_id, series_id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(WatchedSeries {
                    user_id: row.get(0)?,
                    series_id: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn refresh(&self) -> AppResult<()> {
        self.republish_films()?;
        self.republish_series()
    }
}
