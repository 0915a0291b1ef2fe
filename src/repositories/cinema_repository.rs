// src/repositories/cinema_repository.rs
//
// Cinema venue persistence, including the per-user nearby markings.

use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::{Cinema, NearbyCinema};
use crate::error::{AppError, AppResult};
use crate::state::CollectionSource;

pub trait CinemaRepository: Send + Sync {
    fn insert(&self, cinema: &Cinema) -> AppResult<i64>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<Cinema>>;
    fn list_all(&self) -> AppResult<Vec<Cinema>>;
    fn delete(&self, id: i64) -> AppResult<()>;

    fn mark_nearby(&self, user_id: i64, cinema_id: i64) -> AppResult<()>;
    fn unmark_nearby(&self, user_id: i64, cinema_id: i64) -> AppResult<()>;
    fn list_nearby_markings(&self) -> AppResult<Vec<NearbyCinema>>;
    fn nearby_for_user(&self, user_id: i64) -> AppResult<Vec<Cinema>>;

    fn refresh(&self) -> AppResult<()>;
}

pub struct SqliteCinemaRepository {
    pool: Arc<ConnectionPool>,
    cinema_source: CollectionSource<Cinema>,
    nearby_source: CollectionSource<NearbyCinema>,
}

impl SqliteCinemaRepository {
    pub fn new(
        pool: Arc<ConnectionPool>,
        cinema_source: CollectionSource<Cinema>,
        nearby_source: CollectionSource<NearbyCinema>,
    ) -> Self {
        Self {
            pool,
            cinema_source,
            nearby_source,
        }
    }

    fn row_to_cinema(row: &Row) -> Result<Cinema, rusqlite::Error> {
        Ok(Cinema {
            id: row.get("id")?,
            name: row.get("name")?,
            address: row.get("address")?,
            province: row.get("province")?,
        })
    }

    fn republish_cinemas(&self) -> AppResult<()> {
        self.cinema_source.publish(self.list_all()?);
        Ok(())
    }

    fn republish_nearby(&self) -> AppResult<()> {
        self.nearby_source.publish(self.list_nearby_markings()?);
        Ok(())
    }
}

impl CinemaRepository for SqliteCinemaRepository {
    fn insert(&self, cinema: &Cinema) -> AppResult<i64> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO cinema (name, address, province) VALUES (?1, ?2, ?3)",
            params![cinema.name, cinema.address, cinema.province],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.republish_cinemas()?;
        Ok(id)
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Cinema>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT id, name, address, province FROM cinema WHERE id = ?1")?;

        match stmt.query_row(params![id], Self::row_to_cinema) {
            Ok(cinema) => Ok(Some(cinema)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<Cinema>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name, address, province FROM cinema ORDER BY id")?;
        let cinemas = stmt
            .query_map([], Self::row_to_cinema)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cinemas)
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM nearby_cinema WHERE cinema_id = ?1", params![id])?;
        conn.execute("DELETE FROM cinema WHERE id = ?1", params![id])?;
        drop(conn);

        self.republish_cinemas()?;
        self.republish_nearby()
    }

    fn mark_nearby(&self, user_id: i64, cinema_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR IGNORE INTO nearby_cinema (user_id, cinema_id) VALUES (?1, ?2)",
            params![user_id, cinema_id],
        )?;
        drop(conn);

        self.republish_nearby()
    }

    fn unmark_nearby(&self, user_id: i64, cinema_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "DELETE FROM nearby_cinema WHERE user_id = ?1 AND cinema_id = ?2",
            params![user_id, cinema_id],
        )?;
        drop(conn);

        self.republish_nearby()
    }

    fn list_nearby_markings(&self) -> AppResult<Vec<NearbyCinema>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT user_id, cinema_id FROM nearby_cinema ORDER BY user_id, cinema_id",
        )?;
        let markings = stmt
            .query_map([], |row| {
                Ok(NearbyCinema {
                    user_id: row.get(0)?,
                    cinema_id: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(markings)
    }

    fn nearby_for_user(&self, user_id: i64) -> AppResult<Vec<Cinema>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT c.id, c.name, c.address, c.province
             FROM cinema c
             JOIN nearby_cinema n ON n.cinema_id = c.id
             WHERE n.user_id = ?1
             ORDER BY c.id",
        )?;
        let cinemas = stmt
            .query_map(params![user_id], Self::row_to_cinema)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cinemas)
    }

    fn refresh(&self) -> AppResult<()> {
        self.republish_cinemas()?;
        self.republish_nearby()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_in_memory_pool, initialize_database};
    use crate::domain::User;
    use crate::repositories::{SqliteUserRepository, UserRepository};
    use crate::state::SourceSet;

    fn fixture() -> (SqliteCinemaRepository, i64) {
        let pool = Arc::new(create_in_memory_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        let sources = SourceSet::new();

        let users = SqliteUserRepository::new(Arc::clone(&pool), sources.users.clone());
        let user_id = users.insert(&User::new("mario")).unwrap();

        (
            SqliteCinemaRepository::new(
                pool,
                sources.cinemas.clone(),
                sources.nearby_cinemas.clone(),
            ),
            user_id,
        )
    }

    fn sample_cinema() -> Cinema {
        Cinema {
            id: 0,
            name: "Cinema Odeon".to_string(),
            address: "Via Roma 1".to_string(),
            province: "MI".to_string(),
        }
    }

    #[test]
    fn test_nearby_marking_round_trip() {
        let (repo, user_id) = fixture();

        let cinema_id = repo.insert(&sample_cinema()).unwrap();
        repo.mark_nearby(user_id, cinema_id).unwrap();

        let nearby = repo.nearby_for_user(user_id).unwrap();
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].name, "Cinema Odeon");

        repo.unmark_nearby(user_id, cinema_id).unwrap();
        assert!(repo.nearby_for_user(user_id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_removes_markings() {
        let (repo, user_id) = fixture();

        let cinema_id = repo.insert(&sample_cinema()).unwrap();
        repo.mark_nearby(user_id, cinema_id).unwrap();
        repo.delete(cinema_id).unwrap();

        assert!(repo.get_by_id(cinema_id).unwrap().is_none());
        assert!(repo.list_nearby_markings().unwrap().is_empty());
    }
}
