// src/repositories/achievement_repository.rs
//
// Achievement persistence. The composite (user_id, trophy_id) primary key
// plus INSERT OR IGNORE is the system's guard against double-unlock:
// concurrent evaluate-then-apply sequences race here and exactly one wins.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::Achievement;
use crate::error::AppResult;
use crate::state::CollectionSource;

pub trait AchievementRepository: Send + Sync {
    /// Insert an unlock record; returns false if the pair already existed
    fn unlock(&self, user_id: i64, trophy_id: i64, unlocked_at: DateTime<Utc>) -> AppResult<bool>;
    fn list_all(&self) -> AppResult<Vec<Achievement>>;
    fn list_by_user(&self, user_id: i64) -> AppResult<Vec<Achievement>>;
    fn count_for_user(&self, user_id: i64) -> AppResult<usize>;
    fn is_unlocked(&self, user_id: i64, trophy_id: i64) -> AppResult<bool>;
    fn refresh(&self) -> AppResult<()>;
}

pub struct SqliteAchievementRepository {
    pool: Arc<ConnectionPool>,
    source: CollectionSource<Achievement>,
}

impl SqliteAchievementRepository {
    pub fn new(pool: Arc<ConnectionPool>, source: CollectionSource<Achievement>) -> Self {
        Self { pool, source }
    }

    fn row_to_achievement(row: &Row) -> Result<Achievement, rusqlite::Error> {
        let unlocked_at_str: String = row.get("unlocked_at")?;
        let unlocked_at = DateTime::parse_from_rfc3339(&unlocked_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(Achievement {
            user_id: row.get("user_id")?,
            trophy_id: row.get("trophy_id")?,
            unlocked_at,
        })
    }

    fn republish(&self) -> AppResult<()> {
        self.source.publish(self.list_all()?);
        Ok(())
    }
}

impl AchievementRepository for SqliteAchievementRepository {
    fn unlock(&self, user_id: i64, trophy_id: i64, unlocked_at: DateTime<Utc>) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO achievement (user_id, trophy_id, unlocked_at)
             VALUES (?1, ?2, ?3)",
            params![user_id, trophy_id, unlocked_at.to_rfc3339()],
        )? > 0;
        drop(conn);

        self.republish()?;
        Ok(inserted)
    }

    fn list_all(&self) -> AppResult<Vec<Achievement>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT user_id, trophy_id, unlocked_at FROM achievement
             ORDER BY user_id, trophy_id",
        )?;
        let achievements = stmt
            .query_map([], Self::row_to_achievement)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(achievements)
    }

    fn list_by_user(&self, user_id: i64) -> AppResult<Vec<Achievement>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT user_id, trophy_id, unlocked_at FROM achievement
             WHERE user_id = ?1 ORDER BY trophy_id",
        )?;
        let achievements = stmt
            .query_map(params![user_id], Self::row_to_achievement)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(achievements)
    }

    fn count_for_user(&self, user_id: i64) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM achievement WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn is_unlocked(&self, user_id: i64, trophy_id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM achievement WHERE user_id = ?1 AND trophy_id = ?2)",
            params![user_id, trophy_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn refresh(&self) -> AppResult<()> {
        self.republish()
    }
}
