// src/repositories/film_repository.rs
//
// Film catalog persistence

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::Film;
use crate::error::{AppError, AppResult};
use crate::state::CollectionSource;

pub trait FilmRepository: Send + Sync {
    fn insert(&self, film: &Film) -> AppResult<i64>;
    fn save(&self, film: &Film) -> AppResult<()>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<Film>>;
    fn list_all(&self) -> AppResult<Vec<Film>>;
    fn list_visible(&self) -> AppResult<Vec<Film>>;
    fn delete(&self, id: i64) -> AppResult<()>;
    fn set_visible(&self, id: i64, visible: bool) -> AppResult<()>;
    fn set_rating(&self, id: i64, stars: i32) -> AppResult<()>;
    fn increment_views(&self, id: i64) -> AppResult<()>;
    /// Saturating at zero
    fn decrement_views(&self, id: i64) -> AppResult<()>;
    /// Republish the current table contents to the state aggregator
    fn refresh(&self) -> AppResult<()>;
}

pub struct SqliteFilmRepository {
    pool: Arc<ConnectionPool>,
    source: CollectionSource<Film>,
}

impl SqliteFilmRepository {
    pub fn new(pool: Arc<ConnectionPool>, source: CollectionSource<Film>) -> Self {
        Self { pool, source }
    }

    /// Map database row to Film - returns rusqlite::Error for query_map compatibility
    fn row_to_film(row: &Row) -> Result<Film, rusqlite::Error> {
        let release_date_str: Option<String> = row.get("release_date")?;
        let release_date = release_date_str
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
            })
            .transpose()?;

        Ok(Film {
            id: row.get("id")?,
            title: row.get("title")?,
            cast_count: row.get::<_, i64>("cast_count")? as u32,
            description: row.get("description")?,
            release_date,
            duration_minutes: row.get::<_, i64>("duration_minutes")? as u32,
            category: row.get("category")?,
            visible: row.get("visible")?,
            views: row.get::<_, i64>("views")? as u32,
            stars: row.get("stars")?,
        })
    }

    fn republish(&self) -> AppResult<()> {
        self.source.publish(self.list_all()?);
        Ok(())
    }
}

const FILM_COLUMNS: &str =
    "id, title, cast_count, description, release_date, duration_minutes, category, visible, views, stars";

impl FilmRepository for SqliteFilmRepository {
    fn insert(&self, film: &Film) -> AppResult<i64> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO film (title, cast_count, description, release_date,
                               duration_minutes, category, visible, views, stars)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                film.title,
                film.cast_count as i64,
                film.description,
                film.release_date.map(|dt| dt.to_rfc3339()),
                film.duration_minutes as i64,
                film.category,
                film.visible,
                film.views as i64,
                film.stars,
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.republish()?;
        Ok(id)
    }

    fn save(&self, film: &Film) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR REPLACE INTO film (id, title, cast_count, description, release_date,
                                          duration_minutes, category, visible, views, stars)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                film.id,
                film.title,
                film.cast_count as i64,
                film.description,
                film.release_date.map(|dt| dt.to_rfc3339()),
                film.duration_minutes as i64,
                film.category,
                film.visible,
                film.views as i64,
                film.stars,
            ],
        )?;
        drop(conn);

        self.republish()
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Film>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM film WHERE id = ?1", FILM_COLUMNS))?;

        match stmt.query_row(params![id], Self::row_to_film) {
            Ok(film) => Ok(Some(film)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<Film>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM film ORDER BY id", FILM_COLUMNS))?;
        let films = stmt
            .query_map([], Self::row_to_film)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(films)
    }

    fn list_visible(&self) -> AppResult<Vec<Film>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM film WHERE visible = 1 ORDER BY id",
            FILM_COLUMNS
        ))?;
        let films = stmt
            .query_map([], Self::row_to_film)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(films)
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM film WHERE id = ?1", params![id])?;
        drop(conn);

        self.republish()
    }

    fn set_visible(&self, id: i64, visible: bool) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE film SET visible = ?2 WHERE id = ?1",
            params![id, visible],
        )?;
        drop(conn);

        self.republish()
    }

    fn set_rating(&self, id: i64, stars: i32) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE film SET stars = ?2 WHERE id = ?1",
            params![id, stars],
        )?;
        drop(conn);

        self.republish()
    }

    fn increment_views(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("UPDATE film SET views = views + 1 WHERE id = ?1", params![id])?;
        drop(conn);

        self.republish()
    }

    fn decrement_views(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE film SET views = MAX(views - 1, 0) WHERE id = ?1",
            params![id],
        )?;
        drop(conn);

        self.republish()
    }

    fn refresh(&self) -> AppResult<()> {
        self.republish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_in_memory_pool, initialize_database};
    use crate::state::SourceSet;

    fn repo() -> (SqliteFilmRepository, SourceSet) {
        let pool = Arc::new(create_in_memory_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        let sources = SourceSet::new();
        (
            SqliteFilmRepository::new(pool, sources.films.clone()),
            sources,
        )
    }

    #[test]
    fn test_insert_and_get() {
        let (repo, _sources) = repo();

        let id = repo.insert(&Film::new("Il Padrino", 175, "Drammatico")).unwrap();
        let film = repo.get_by_id(id).unwrap().unwrap();
        assert_eq!(film.title, "Il Padrino");
        assert_eq!(film.duration_minutes, 175);
        assert!(film.visible);
    }

    #[test]
    fn test_missing_film_is_none() {
        let (repo, _sources) = repo();
        assert!(repo.get_by_id(999).unwrap().is_none());
    }

    #[test]
    fn test_views_saturate_at_zero() {
        let (repo, _sources) = repo();
        let id = repo.insert(&Film::new("Film", 90, "Comico")).unwrap();

        repo.decrement_views(id).unwrap();
        assert_eq!(repo.get_by_id(id).unwrap().unwrap().views, 0);

        repo.increment_views(id).unwrap();
        repo.increment_views(id).unwrap();
        repo.decrement_views(id).unwrap();
        assert_eq!(repo.get_by_id(id).unwrap().unwrap().views, 1);
    }

    #[test]
    fn test_visibility_flag_filters_listing() {
        let (repo, _sources) = repo();
        let mut hidden = Film::new("Pending", 100, "Azione");
        hidden.visible = false;
        repo.insert(&hidden).unwrap();
        repo.insert(&Film::new("Public", 100, "Azione")).unwrap();

        assert_eq!(repo.list_all().unwrap().len(), 2);
        let visible = repo.list_visible().unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Public");
    }

    #[test]
    fn test_writes_republish_collection() {
        let (repo, sources) = repo();
        assert!(sources.films.latest().is_none());

        repo.insert(&Film::new("Film", 90, "Comico")).unwrap();
        assert_eq!(sources.films.latest().unwrap().len(), 1);

        repo.set_rating(1, 4).unwrap();
        assert_eq!(sources.films.latest().unwrap()[0].stars, 4);
    }
}
