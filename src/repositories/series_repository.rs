// src/repositories/series_repository.rs
//
// Series catalog persistence; mirrors the film repository

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::Series;
use crate::error::{AppError, AppResult};
use crate::state::CollectionSource;

pub trait SeriesRepository: Send + Sync {
    fn insert(&self, series: &Series) -> AppResult<i64>;
    fn save(&self, series: &Series) -> AppResult<()>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<Series>>;
    fn list_all(&self) -> AppResult<Vec<Series>>;
    fn list_visible(&self) -> AppResult<Vec<Series>>;
    fn delete(&self, id: i64) -> AppResult<()>;
    fn set_visible(&self, id: i64, visible: bool) -> AppResult<()>;
    fn set_rating(&self, id: i64, stars: i32) -> AppResult<()>;
    fn increment_views(&self, id: i64) -> AppResult<()>;
    fn decrement_views(&self, id: i64) -> AppResult<()>;
    fn refresh(&self) -> AppResult<()>;
}

pub struct SqliteSeriesRepository {
    pool: Arc<ConnectionPool>,
    source: CollectionSource<Series>,
}

const SERIES_COLUMNS: &str =
    "id, title, cast_count, description, release_date, duration_minutes, category, visible, views, stars";

impl SqliteSeriesRepository {
    pub fn new(pool: Arc<ConnectionPool>, source: CollectionSource<Series>) -> Self {
        Self { pool, source }
    }

    fn row_to_series(row: &Row) -> Result<Series, rusqlite::Error> {
        let release_date_str: Option<String> = row.get("release_date")?;
        let release_date = release_date_str
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
            })
            .transpose()?;

        Ok(Series {
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

impl SeriesRepository for SqliteSeriesRepository {
    fn insert(&self, series: &Series) -> AppResult<i64> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO series (title, cast_count, description, release_date,
                                 duration_minutes, category, visible, views, stars)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                series.title,
                series.cast_count as i64,
                series.description,
                series.release_date.map(|dt| dt.to_rfc3339()),
                series.duration_minutes as i64,
                series.category,
                series.visible,
                series.views as i64,
                series.stars,
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.republish()?;
        Ok(id)
    }

    fn save(&self, series: &Series) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR REPLACE INTO series (id, title, cast_count, description, release_date,
                                            duration_minutes, category, visible, views, stars)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                series.id,
                series.title,
                series.cast_count as i64,
                series.description,
                series.release_date.map(|dt| dt.to_rfc3339()),
                series.duration_minutes as i64,
                series.category,
                series.visible,
                series.views as i64,
                series.stars,
            ],
        )?;
        drop(conn);

        self.republish()
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Series>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare(&format!("SELECT {} FROM series WHERE id = ?1", SERIES_COLUMNS))?;

        match stmt.query_row(params![id], Self::row_to_series) {
            Ok(series) => Ok(Some(series)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<Series>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare(&format!("SELECT {} FROM series ORDER BY id", SERIES_COLUMNS))?;
        let series = stmt
            .query_map([], Self::row_to_series)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(series)
    }

    fn list_visible(&self) -> AppResult<Vec<Series>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM series WHERE visible = 1 ORDER BY id",
            SERIES_COLUMNS
        ))?;
        let series = stmt
            .query_map([], Self::row_to_series)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(series)
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM series WHERE id = ?1", params![id])?;
        drop(conn);

        self.republish()
    }

    fn set_visible(&self, id: i64, visible: bool) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE series SET visible = ?2 WHERE id = ?1",
            params![id, visible],
        )?;
        drop(conn);

        self.republish()
    }

    fn set_rating(&self, id: i64, stars: i32) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE series SET stars = ?2 WHERE id = ?1",
            params![id, stars],
        )?;
        drop(conn);

        self.republish()
    }

    fn increment_views(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE series SET views = views + 1 WHERE id = ?1",
            params![id],
        )?;
        drop(conn);

        self.republish()
    }

    fn decrement_views(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE series SET views = MAX(views - 1, 0) WHERE id = ?1",
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

    fn repo() -> SqliteSeriesRepository {
        let pool = Arc::new(create_in_memory_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        let sources = SourceSet::new();
        SqliteSeriesRepository::new(pool, sources.series.clone())
    }

    #[test]
    fn test_insert_and_round_trip() {
        let repo = repo();

        let mut series = Series::new("Breaking Bad", 47, "Drammatico");
        series.description = "Un professore di chimica".to_string();
        let id = repo.insert(&series).unwrap();

        let loaded = repo.get_by_id(id).unwrap().unwrap();
        assert_eq!(loaded.title, "Breaking Bad");
        assert_eq!(loaded.description, "Un professore di chimica");
    }

    #[test]
    fn test_set_rating_persists() {
        let repo = repo();
        let id = repo.insert(&Series::new("Dark", 50, "Fantascienza")).unwrap();

        repo.set_rating(id, 5).unwrap();
        assert_eq!(repo.get_by_id(id).unwrap().unwrap().stars, 5);
    }
}
