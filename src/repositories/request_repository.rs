// src/repositories/request_repository.rs
//
// Catalog request persistence (films and series)

use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::{FilmRequest, SeriesRequest};
use crate::error::{AppError, AppResult};
use crate::state::CollectionSource;

pub trait RequestRepository: Send + Sync {
    fn insert_film_request(&self, request: &FilmRequest) -> AppResult<i64>;
    fn get_film_request(&self, id: i64) -> AppResult<Option<FilmRequest>>;
    fn list_film_requests(&self) -> AppResult<Vec<FilmRequest>>;
    fn list_film_requests_by_status(&self, approved: bool) -> AppResult<Vec<FilmRequest>>;
    fn list_film_requests_by_user(&self, requester_id: i64) -> AppResult<Vec<FilmRequest>>;
    fn set_film_approval(&self, id: i64, approved: bool) -> AppResult<()>;
    fn delete_film_request(&self, id: i64) -> AppResult<()>;

    fn insert_series_request(&self, request: &SeriesRequest) -> AppResult<i64>;
    fn get_series_request(&self, id: i64) -> AppResult<Option<SeriesRequest>>;
    fn list_series_requests(&self) -> AppResult<Vec<SeriesRequest>>;
    fn list_series_requests_by_status(&self, approved: bool) -> AppResult<Vec<SeriesRequest>>;
    fn list_series_requests_by_user(&self, requester_id: i64) -> AppResult<Vec<SeriesRequest>>;
    fn set_series_approval(&self, id: i64, approved: bool) -> AppResult<()>;
    fn delete_series_request(&self, id: i64) -> AppResult<()>;

    fn refresh(&self) -> AppResult<()>;
}

pub struct SqliteRequestRepository {
    pool: Arc<ConnectionPool>,
    film_source: CollectionSource<FilmRequest>,
    series_source: CollectionSource<SeriesRequest>,
}

impl SqliteRequestRepository {
    pub fn new(
        pool: Arc<ConnectionPool>,
        film_source: CollectionSource<FilmRequest>,
        series_source: CollectionSource<SeriesRequest>,
    ) -> Self {
        Self {
            pool,
            film_source,
            series_source,
        }
    }

    fn row_to_film_request(row: &Row) -> Result<FilmRequest, rusqlite::Error> {
        Ok(FilmRequest {
            id: row.get("id")?,
            film_id: row.get("film_id")?,
            requester_id: row.get("requester_id")?,
            approver_id: row.get("approver_id")?,
            approved: row.get("approved")?,
        })
    }

    fn row_to_series_request(row: &Row) -> Result<SeriesRequest, rusqlite::Error> {
        Ok(SeriesRequest {
            id: row.get("id")?,
            series_id: row.get("series_id")?,
            requester_id: row.get("requester_id")?,
            approver_id: row.get("approver_id")?,
            approved: row.get("approved")?,
        })
    }

    fn republish_films(&self) -> AppResult<()> {
        self.film_source.publish(self.list_film_requests()?);
        Ok(())
    }

    fn republish_series(&self) -> AppResult<()> {
        self.series_source.publish(self.list_series_requests()?);
        Ok(())
    }

    fn query_film_requests(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> AppResult<Vec<FilmRequest>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, Self::row_to_film_request)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn query_series_requests(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> AppResult<Vec<SeriesRequest>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, Self::row_to_series_request)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl RequestRepository for SqliteRequestRepository {
    fn insert_film_request(&self, request: &FilmRequest) -> AppResult<i64> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO film_request (film_id, requester_id, approver_id, approved)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                request.film_id,
                request.requester_id,
                request.approver_id,
                request.approved
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.republish_films()?;
        Ok(id)
    }

    fn get_film_request(&self, id: i64) -> AppResult<Option<FilmRequest>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, film_id, requester_id, approver_id, approved
             FROM film_request WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], Self::row_to_film_request) {
            Ok(request) => Ok(Some(request)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_film_requests(&self) -> AppResult<Vec<FilmRequest>> {
        self.query_film_requests(
            "SELECT id, film_id, requester_id, approver_id, approved
             FROM film_request ORDER BY id",
            &[],
        )
    }

    fn list_film_requests_by_status(&self, approved: bool) -> AppResult<Vec<FilmRequest>> {
        self.query_film_requests(
            "SELECT id, film_id, requester_id, approver_id, approved
             FROM film_request WHERE approved = ?1 ORDER BY id",
            &[&approved],
        )
    }

    fn list_film_requests_by_user(&self, requester_id: i64) -> AppResult<Vec<FilmRequest>> {
        self.query_film_requests(
            "SELECT id, film_id, requester_id, approver_id, approved
             FROM film_request WHERE requester_id = ?1 ORDER BY id",
            &[&requester_id],
        )
    }

    fn set_film_approval(&self, id: i64, approved: bool) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE film_request SET approved = ?2 WHERE id = ?1",
            params![id, approved],
        )?;
        drop(conn);

        self.republish_films()
    }

    fn delete_film_request(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM film_request WHERE id = ?1", params![id])?;
        drop(conn);

        self.republish_films()
    }

    fn insert_series_request(&self, request: &SeriesRequest) -> AppResult<i64> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO series_request (series_id, requester_id, approver_id, approved)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                request.series_id,
                request.requester_id,
                request.approver_id,
                request.approved
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.republish_series()?;
        Ok(id)
    }

    fn get_series_request(&self, id: i64) -> AppResult<Option<SeriesRequest>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, series_id, requester_id, approver_id, approved
             FROM series_request WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], Self::row_to_series_request) {
            Ok(request) => Ok(Some(request)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_series_requests(&self) -> AppResult<Vec<SeriesRequest>> {
        self.query_series_requests(
            "SELECT id, series_id, requester_id, approver_id, approved
             FROM series_request ORDER BY id",
            &[],
        )
    }

    fn list_series_requests_by_status(&self, approved: bool) -> AppResult<Vec<SeriesRequest>> {
        self.query_series_requests(
            "SELECT id, series_id, requester_id, approver_id, approved
             FROM series_request WHERE approved = ?1 ORDER BY id",
            &[&approved],
        )
    }

    fn list_series_requests_by_user(&self, requester_id: i64) -> AppResult<Vec<SeriesRequest>> {
        self.query_series_requests(
            "SELECT id, series_id, requester_id, approver_id, approved
             FROM series_request WHERE requester_id = ?1 ORDER BY id",
            &[&requester_id],
        )
    }

    fn set_series_approval(&self, id: i64, approved: bool) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE series_request SET approved = ?2 WHERE id = ?1",
            params![id, approved],
        )?;
        drop(conn);

        self.republish_series()
    }

    fn delete_series_request(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM series_request WHERE id = ?1", params![id])?;
        drop(conn);

        self.republish_series()
    }

    fn refresh(&self) -> AppResult<()> {
        self.republish_films()?;
        self.republish_series()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_in_memory_pool, initialize_database};
    use crate::domain::{Film, User};
    use crate::repositories::{FilmRepository, SqliteFilmRepository, SqliteUserRepository, UserRepository};
    use crate::state::SourceSet;

    fn fixture() -> (SqliteRequestRepository, i64, i64, i64) {
        let pool = Arc::new(create_in_memory_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        let sources = SourceSet::new();

        let users = SqliteUserRepository::new(Arc::clone(&pool), sources.users.clone());
        let requester = users.insert(&User::new("mario")).unwrap();
        let mut admin = User::new("admin");
        admin.is_admin = true;
        let approver = users.insert(&admin).unwrap();

        let films = SqliteFilmRepository::new(Arc::clone(&pool), sources.films.clone());
        let mut pending = Film::new("Pending", 100, "Azione");
        pending.visible = false;
        let film_id = films.insert(&pending).unwrap();

        let requests = SqliteRequestRepository::new(
            pool,
            sources.film_requests.clone(),
            sources.series_requests.clone(),
        );
        (requests, film_id, requester, approver)
    }

    #[test]
    fn test_film_request_lifecycle() {
        let (requests, film_id, requester, approver) = fixture();

        let id = requests
            .insert_film_request(&FilmRequest {
                id: 0,
                film_id,
                requester_id: requester,
                approver_id: approver,
                approved: false,
            })
            .unwrap();

        assert_eq!(requests.list_film_requests_by_status(false).unwrap().len(), 1);
        assert!(requests.list_film_requests_by_status(true).unwrap().is_empty());

        requests.set_film_approval(id, true).unwrap();
        assert!(requests.get_film_request(id).unwrap().unwrap().approved);

        requests.delete_film_request(id).unwrap();
        assert!(requests.get_film_request(id).unwrap().is_none());
    }

    #[test]
    fn test_requests_filtered_by_user() {
        let (requests, film_id, requester, approver) = fixture();

        requests
            .insert_film_request(&FilmRequest {
                id: 0,
                film_id,
                requester_id: requester,
                approver_id: approver,
                approved: false,
            })
            .unwrap();

        assert_eq!(requests.list_film_requests_by_user(requester).unwrap().len(), 1);
        assert!(requests.list_film_requests_by_user(approver).unwrap().is_empty());
    }
}
