// src/repositories/follower_repository.rs
//
// Social graph persistence. Edges are directed; the composite primary
// key makes a repeated follow a no-op.

use rusqlite::params;
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::Follower;
use crate::error::AppResult;
use crate::state::CollectionSource;

pub trait FollowerRepository: Send + Sync {
    /// Returns true if the edge was actually created
    fn follow(&self, follower_id: i64, followed_id: i64) -> AppResult<bool>;
    fn unfollow(&self, follower_id: i64, followed_id: i64) -> AppResult<bool>;
    fn list_all(&self) -> AppResult<Vec<Follower>>;
    fn followers_of(&self, followed_id: i64) -> AppResult<Vec<i64>>;
    fn refresh(&self) -> AppResult<()>;
}

pub struct SqliteFollowerRepository {
    pool: Arc<ConnectionPool>,
    source: CollectionSource<Follower>,
}

impl SqliteFollowerRepository {
    pub fn new(pool: Arc<ConnectionPool>, source: CollectionSource<Follower>) -> Self {
        Self { pool, source }
    }

    fn republish(&self) -> AppResult<()> {
        self.source.publish(self.list_all()?);
        Ok(())
    }
}

impl FollowerRepository for SqliteFollowerRepository {
    fn follow(&self, follower_id: i64, followed_id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO follower (follower_id, followed_id) VALUES (?1, ?2)",
            params![follower_id, followed_id],
        )? > 0;
        drop(conn);

        self.republish()?;
        Ok(inserted)
    }

    fn unfollow(&self, follower_id: i64, followed_id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let removed = conn.execute(
            "DELETE FROM follower WHERE follower_id = ?1 AND followed_id = ?2",
            params![follower_id, followed_id],
        )? > 0;
        drop(conn);

        self.republish()?;
        Ok(removed)
    }

    fn list_all(&self) -> AppResult<Vec<Follower>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT follower_id, followed_id FROM follower ORDER BY follower_id, followed_id",
        )?;
        let edges = stmt
            .query_map([], |row| {
                Ok(Follower {
                    follower_id: row.get(0)?,
                    followed_id: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(edges)
    }

    fn followers_of(&self, followed_id: i64) -> AppResult<Vec<i64>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT follower_id FROM follower WHERE followed_id = ?1 ORDER BY follower_id",
        )?;
        let ids = stmt
            .query_map(params![followed_id], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    fn refresh(&self) -> AppResult<()> {
        self.republish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_in_memory_pool, initialize_database};
    use crate::domain::User;
    use crate::repositories::{SqliteUserRepository, UserRepository};
    use crate::state::SourceSet;

    fn fixture() -> (SqliteFollowerRepository, i64, i64) {
        let pool = Arc::new(create_in_memory_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        let sources = SourceSet::new();

        let users = SqliteUserRepository::new(Arc::clone(&pool), sources.users.clone());
        let mario = users.insert(&User::new("mario")).unwrap();
        let luigi = users.insert(&User::new("luigi")).unwrap();

        (
            SqliteFollowerRepository::new(pool, sources.followers.clone()),
            mario,
            luigi,
        )
    }

    #[test]
    fn test_follow_is_idempotent() {
        let (repo, mario, luigi) = fixture();

        assert!(repo.follow(mario, luigi).unwrap());
        assert!(!repo.follow(mario, luigi).unwrap());
        assert_eq!(repo.followers_of(luigi).unwrap(), vec![mario]);
    }

    #[test]
    fn test_edges_are_directed() {
        let (repo, mario, luigi) = fixture();

        repo.follow(mario, luigi).unwrap();
        assert_eq!(repo.followers_of(luigi).unwrap().len(), 1);
        assert!(repo.followers_of(mario).unwrap().is_empty());
    }

    #[test]
    fn test_unfollow_removes_edge() {
        let (repo, mario, luigi) = fixture();

        repo.follow(mario, luigi).unwrap();
        assert!(repo.unfollow(mario, luigi).unwrap());
        assert!(!repo.unfollow(mario, luigi).unwrap());
        assert!(repo.list_all().unwrap().is_empty());
    }
}
