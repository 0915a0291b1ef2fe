// src/repositories/trophy_repository.rs
//
// Trophy catalog persistence. The catalog is seeded by the schema and
// immutable afterward; this repository only reads.

use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::{Trophy, TrophyRule};
use crate::error::{AppError, AppResult};
use crate::state::CollectionSource;

pub trait TrophyRepository: Send + Sync {
    fn get_by_id(&self, id: i64) -> AppResult<Option<Trophy>>;
    fn list_all(&self) -> AppResult<Vec<Trophy>>;
    fn refresh(&self) -> AppResult<()>;
}

pub struct SqliteTrophyRepository {
    pool: Arc<ConnectionPool>,
    source: CollectionSource<Trophy>,
}

impl SqliteTrophyRepository {
    pub fn new(pool: Arc<ConnectionPool>, source: CollectionSource<Trophy>) -> Self {
        Self { pool, source }
    }

    fn row_to_trophy(row: &Row) -> Result<Trophy, rusqlite::Error> {
        let rule_key: String = row.get("rule")?;
        Ok(Trophy {
            id: row.get("id")?,
            name: row.get("name")?,
            rule: TrophyRule::from_key(&rule_key),
        })
    }
}

impl TrophyRepository for SqliteTrophyRepository {
    fn get_by_id(&self, id: i64) -> AppResult<Option<Trophy>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name, rule FROM trophy WHERE id = ?1")?;

        match stmt.query_row(params![id], Self::row_to_trophy) {
            Ok(trophy) => Ok(Some(trophy)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<Trophy>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name, rule FROM trophy ORDER BY id")?;
        let trophies = stmt
            .query_map([], Self::row_to_trophy)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(trophies)
    }

    fn refresh(&self) -> AppResult<()> {
        self.source.publish(self.list_all()?);
        Ok(())
    }
}
