// src/repositories/user_repository.rs
//
// User persistence. Watch lists are stored as JSON-encoded id arrays,
// mirrored by the watch history tables.

use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::User;
use crate::error::{AppError, AppResult};
use crate::state::CollectionSource;

pub trait UserRepository: Send + Sync {
    fn insert(&self, user: &User) -> AppResult<i64>;
    fn save(&self, user: &User) -> AppResult<()>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<User>>;
    fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    fn list_all(&self) -> AppResult<Vec<User>>;
    fn delete(&self, id: i64) -> AppResult<()>;
    fn refresh(&self) -> AppResult<()>;
}

pub struct SqliteUserRepository {
    pool: Arc<ConnectionPool>,
    source: CollectionSource<User>,
}

const USER_COLUMNS: &str =
    "id, username, first_name, last_name, password, residence, is_admin, watched_films, watched_series";

impl SqliteUserRepository {
    pub fn new(pool: Arc<ConnectionPool>, source: CollectionSource<User>) -> Self {
        Self { pool, source }
    }

    fn row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
        let watched_films_json: String = row.get("watched_films")?;
        let watched_films: Vec<i64> = serde_json::from_str(&watched_films_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let watched_series_json: String = row.get("watched_series")?;
        let watched_series: Vec<i64> = serde_json::from_str(&watched_series_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(User {
            id: row.get("id")?,
            username: row.get("username")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            password: row.get("password")?,
            residence: row.get("residence")?,
            is_admin: row.get("is_admin")?,
            watched_films,
            watched_series,
        })
    }

    fn republish(&self) -> AppResult<()> {
        self.source.publish(self.list_all()?);
        Ok(())
    }
}

impl UserRepository for SqliteUserRepository {
    fn insert(&self, user: &User) -> AppResult<i64> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO users (username, first_name, last_name, password,
                                residence, is_admin, watched_films, watched_series)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user.username,
                user.first_name,
                user.last_name,
                user.password,
                user.residence,
                user.is_admin,
                serde_json::to_string(&user.watched_films)?,
                serde_json::to_string(&user.watched_series)?,
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.republish()?;
        Ok(id)
    }

    fn save(&self, user: &User) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR REPLACE INTO users (id, username, first_name, last_name, password,
                                           residence, is_admin, watched_films, watched_series)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                user.id,
                user.username,
                user.first_name,
                user.last_name,
                user.password,
                user.residence,
                user.is_admin,
                serde_json::to_string(&user.watched_films)?,
                serde_json::to_string(&user.watched_series)?,
            ],
        )?;
        drop(conn);

        self.republish()
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS))?;

        match stmt.query_row(params![id], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users WHERE username = ?1",
            USER_COLUMNS
        ))?;

        match stmt.query_row(params![username], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<User>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))?;
        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
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

    fn repo() -> SqliteUserRepository {
        let pool = Arc::new(create_in_memory_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        let sources = SourceSet::new();
        SqliteUserRepository::new(pool, sources.users.clone())
    }

    #[test]
    fn test_watch_lists_round_trip() {
        let repo = repo();

        let mut user = User::new("mario.rossi");
        user.watched_films = vec![1, 2, 3];
        user.watched_series = vec![7];
        let id = repo.insert(&user).unwrap();

        let loaded = repo.get_by_id(id).unwrap().unwrap();
        assert_eq!(loaded.watched_films, vec![1, 2, 3]);
        assert_eq!(loaded.watched_series, vec![7]);
    }

    #[test]
    fn test_find_by_username() {
        let repo = repo();
        repo.insert(&User::new("luigi.verdi")).unwrap();

        assert!(repo.find_by_username("luigi.verdi").unwrap().is_some());
        assert!(repo.find_by_username("nessuno").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let repo = repo();
        repo.insert(&User::new("mario")).unwrap();
        assert!(repo.insert(&User::new("mario")).is_err());
    }
}
