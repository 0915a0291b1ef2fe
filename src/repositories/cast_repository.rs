// src/repositories/cast_repository.rs
//
// Actor persistence and the film/series cast join tables.

use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::{Actor, FilmActor, SeriesActor};
use crate::error::{AppError, AppResult};
use crate::state::CollectionSource;

pub trait CastRepository: Send + Sync {
    fn insert_actor(&self, actor: &Actor) -> AppResult<i64>;
    fn find_actor_by_name(&self, first_name: &str, last_name: &str) -> AppResult<Option<Actor>>;
    fn list_actors(&self) -> AppResult<Vec<Actor>>;

    fn link_film_actor(&self, film_id: i64, actor_id: i64) -> AppResult<()>;
    fn unlink_film_actors(&self, film_id: i64) -> AppResult<()>;
    fn list_film_links(&self) -> AppResult<Vec<FilmActor>>;

    fn link_series_actor(&self, series_id: i64, actor_id: i64) -> AppResult<()>;
    fn unlink_series_actors(&self, series_id: i64) -> AppResult<()>;
    fn list_series_links(&self) -> AppResult<Vec<SeriesActor>>;

    fn refresh(&self) -> AppResult<()>;
}

pub struct SqliteCastRepository {
    pool: Arc<ConnectionPool>,
    actor_source: CollectionSource<Actor>,
    film_link_source: CollectionSource<FilmActor>,
    series_link_source: CollectionSource<SeriesActor>,
}

impl SqliteCastRepository {
    pub fn new(
        pool: Arc<ConnectionPool>,
        actor_source: CollectionSource<Actor>,
        film_link_source: CollectionSource<FilmActor>,
        series_link_source: CollectionSource<SeriesActor>,
    ) -> Self {
        Self {
            pool,
            actor_source,
            film_link_source,
            series_link_source,
        }
    }

    fn row_to_actor(row: &Row) -> Result<Actor, rusqlite::Error> {
        Ok(Actor {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
        })
    }

    fn republish_actors(&self) -> AppResult<()> {
        self.actor_source.publish(self.list_actors()?);
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

impl CastRepository for SqliteCastRepository {
    fn insert_actor(&self, actor: &Actor) -> AppResult<i64> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO actor (first_name, last_name) VALUES (?1, ?2)",
            params![actor.first_name, actor.last_name],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.republish_actors()?;
        Ok(id)
    }

    fn find_actor_by_name(&self, first_name: &str, last_name: &str) -> AppResult<Option<Actor>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, first_name, last_name FROM actor
             WHERE first_name = ?1 AND last_name = ?2",
        )?;

        match stmt.query_row(params![first_name, last_name], Self::row_to_actor) {
            Ok(actor) => Ok(Some(actor)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_actors(&self) -> AppResult<Vec<Actor>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, first_name, last_name FROM actor ORDER BY id")?;
        let actors = stmt
            .query_map([], Self::row_to_actor)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(actors)
    }

    fn link_film_actor(&self, film_id: i64, actor_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR IGNORE INTO film_actor (film_id, actor_id) VALUES (?1, ?2)",
            params![film_id, actor_id],
        )?;
        drop(conn);

        self.republish_film_links()
    }

    fn unlink_film_actors(&self, film_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM film_actor WHERE film_id = ?1", params![film_id])?;
        drop(conn);

        self.republish_film_links()
    }

    fn list_film_links(&self) -> AppResult<Vec<FilmActor>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare("SELECT film_id, actor_id FROM film_actor ORDER BY film_id, actor_id")?;
        let links = stmt
            .query_map([], |row| {
                Ok(FilmActor {
                    film_id: row.get(0)?,
                    actor_id: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }

    fn link_series_actor(&self, series_id: i64, actor_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR IGNORE INTO series_actor (series_id, actor_id) VALUES (?1, ?2)",
            params![series_id, actor_id],
        )?;
        drop(conn);

        self.republish_series_links()
    }

    fn unlink_series_actors(&self, series_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "DELETE FROM series_actor WHERE series_id = ?1",
            params![series_id],
        )?;
        drop(conn);

        self.republish_series_links()
    }

    fn list_series_links(&self) -> AppResult<Vec<SeriesActor>> {
        let conn = self.pool.get()?;

        let mut stmt = conn
            .prepare("SELECT series_id, actor_id FROM series_actor ORDER BY series_id, actor_id")?;
        let links = stmt
            .query_map([], |row| {
                Ok(SeriesActor {
                    series_id: row.get(0)?,
                    actor_id: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }

    fn refresh(&self) -> AppResult<()> {
        self.republish_actors()?;
        self.republish_film_links()?;
        self.republish_series_links()
    }
}
