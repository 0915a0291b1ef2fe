// src/repositories/platform_repository.rs
//
// Streaming platform persistence and the film/series availability joins.
// Name lookup is case-insensitive so "netflix" and "Netflix" resolve to
// the same platform row.

use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::{FilmPlatform, Platform, SeriesPlatform};
use crate::error::{AppError, AppResult};
use crate::state::CollectionSource;

pub trait PlatformRepository: Send + Sync {
    fn insert(&self, platform: &Platform) -> AppResult<i64>;
    fn find_by_name(&self, name: &str) -> AppResult<Option<Platform>>;
    fn list_all(&self) -> AppResult<Vec<Platform>>;

    fn link_film(&self, film_id: i64, platform_id: i64) -> AppResult<()>;
    fn unlink_film(&self, film_id: i64) -> AppResult<()>;
    fn list_film_links(&self) -> AppResult<Vec<FilmPlatform>>;

    fn link_series(&self, series_id: i64, platform_id: i64) -> AppResult<()>;
    fn unlink_series(&self, series_id: i64) -> AppResult<()>;
    fn list_series_links(&self) -> AppResult<Vec<SeriesPlatform>>;

    fn refresh(&self) -> AppResult<()>;
}

pub struct SqlitePlatformRepository {
    pool: Arc<ConnectionPool>,
    platform_source: CollectionSource<Platform>,
    film_link_source: CollectionSource<FilmPlatform>,
    series_link_source: CollectionSource<SeriesPlatform>,
}

impl SqlitePlatformRepository {
    pub fn new(
        pool: Arc<ConnectionPool>,
        platform_source: CollectionSource<Platform>,
        film_link_source: CollectionSource<FilmPlatform>,
        series_link_source: CollectionSource<SeriesPlatform>,
    ) -> Self {
        Self {
            pool,
            platform_source,
            film_link_source,
            series_link_source,
        }
    }

    fn row_to_platform(row: &Row) -> Result<Platform, rusqlite::Error> {
        Ok(Platform {
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }

    fn republish_platforms(&self) -> AppResult<()> {
        self.platform_source.publish(self.list_all()?);
        Ok(())
    }

    fn republish_film_links(&self) -> AppResult<()> {
        self.film_link_source.publish(self.list_film_links()?);
        Ok(())
    }

    fn republish_series_links(&self) -> AppResult<()> {
        self.series_link_source.publish(self.list_series_links()?);
        Ok(())
    }
}

impl PlatformRepository for SqlitePlatformRepository {
    fn insert(&self, platform: &Platform) -> AppResult<i64> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO platform (name) VALUES (?1)",
            params![platform.name],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.republish_platforms()?;
        Ok(id)
    }

    fn find_by_name(&self, name: &str) -> AppResult<Option<Platform>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT id, name FROM platform WHERE name = ?1 COLLATE NOCASE")?;

        match stmt.query_row(params![name], Self::row_to_platform) {
            Ok(platform) => Ok(Some(platform)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<Platform>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name FROM platform ORDER BY id")?;
        let platforms = stmt
            .query_map([], Self::row_to_platform)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(platforms)
    }

    fn link_film(&self, film_id: i64, platform_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR IGNORE INTO film_platform (film_id, platform_id) VALUES (?1, ?2)",
            params![film_id, platform_id],
        )?;
        drop(conn);

        self.republish_film_links()
    }

    fn unlink_film(&self, film_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "DELETE FROM film_platform WHERE film_id = ?1",
            params![film_id],
        )?;
        drop(conn);

        self.republish_film_links()
    }

    fn list_film_links(&self) -> AppResult<Vec<FilmPlatform>> {
        let conn = self.pool.get()?;

        let mut stmt = conn
            .prepare("SELECT film_id, platform_id FROM film_platform ORDER BY film_id, platform_id")?;
        let links = stmt
            .query_map([], |row| {
                Ok(FilmPlatform {
                    film_id: row.get(0)?,
                    platform_id: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }

    fn link_series(&self, series_id: i64, platform_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR IGNORE INTO series_platform (series_id, platform_id) VALUES (?1, ?2)",
            params![series_id, platform_id],
        )?;
        drop(conn);

        self.republish_series_links()
    }

    fn unlink_series(&self, series_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "DELETE FROM series_platform WHERE series_id = ?1",
            params![series_id],
        )?;
        drop(conn);

        self.republish_series_links()
    }

    fn list_series_links(&self) -> AppResult<Vec<SeriesPlatform>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT series_id, platform_id FROM series_platform ORDER BY series_id, platform_id",
        )?;
        let links = stmt
            .query_map([], |row| {
                Ok(SeriesPlatform {
                    series_id: row.get(0)?,
                    platform_id: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }

    fn refresh(&self) -> AppResult<()> {
        self.republish_platforms()?;
        self.republish_film_links()?;
        self.republish_series_links()
    }
}
