// src/repositories/notification_repository.rs
//
// Notification persistence. A notification is a single record; a delivery
// row ties it to one recipient and carries that recipient's read state.

use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::{Notification, NotificationDelivery};
use crate::error::AppResult;
use crate::state::CollectionSource;

pub trait NotificationRepository: Send + Sync {
    fn create(&self, title: &str, body: &str) -> AppResult<i64>;
    fn deliver(&self, user_id: i64, notification_id: i64) -> AppResult<()>;
    fn mark_read(&self, user_id: i64, notification_id: i64) -> AppResult<()>;
    fn mark_all_read(&self, user_id: i64) -> AppResult<()>;
    fn list_all(&self) -> AppResult<Vec<Notification>>;
    fn list_deliveries(&self) -> AppResult<Vec<NotificationDelivery>>;
    fn unread_for_user(&self, user_id: i64) -> AppResult<Vec<Notification>>;
    fn refresh(&self) -> AppResult<()>;
}

pub struct SqliteNotificationRepository {
    pool: Arc<ConnectionPool>,
    notification_source: CollectionSource<Notification>,
    delivery_source: CollectionSource<NotificationDelivery>,
}

impl SqliteNotificationRepository {
    pub fn new(
        pool: Arc<ConnectionPool>,
        notification_source: CollectionSource<Notification>,
        delivery_source: CollectionSource<NotificationDelivery>,
    ) -> Self {
        Self {
            pool,
            notification_source,
            delivery_source,
        }
    }

    fn row_to_notification(row: &Row) -> Result<Notification, rusqlite::Error> {
        Ok(Notification {
            id: row.get("id")?,
            title: row.get("title")?,
            body: row.get("body")?,
        })
    }

    fn republish_notifications(&self) -> AppResult<()> {
        self.notification_source.publish(self.list_all()?);
        Ok(())
    }

    fn republish_deliveries(&self) -> AppResult<()> {
        self.delivery_source.publish(self.list_deliveries()?);
        Ok(())
    }
}

impl NotificationRepository for SqliteNotificationRepository {
    fn create(&self, title: &str, body: &str) -> AppResult<i64> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO notification (title, body) VALUES (?1, ?2)",
            params![title, body],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.republish_notifications()?;
        Ok(id)
    }

    fn deliver(&self, user_id: i64, notification_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR IGNORE INTO notification_delivery (user_id, notification_id, read)
             VALUES (?1, ?2, 0)",
            params![user_id, notification_id],
        )?;
        drop(conn);

        self.republish_deliveries()
    }

    fn mark_read(&self, user_id: i64, notification_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE notification_delivery SET read = 1
             WHERE user_id = ?1 AND notification_id = ?2",
            params![user_id, notification_id],
        )?;
        drop(conn);

        self.republish_deliveries()
    }

    fn mark_all_read(&self, user_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE notification_delivery SET read = 1 WHERE user_id = ?1",
            params![user_id],
        )?;
        drop(conn);

        self.republish_deliveries()
    }

    fn list_all(&self) -> AppResult<Vec<Notification>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, title, body FROM notification ORDER BY id")?;
        let notifications = stmt
            .query_map([], Self::row_to_notification)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notifications)
    }

    fn list_deliveries(&self) -> AppResult<Vec<NotificationDelivery>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT user_id, notification_id, read FROM notification_delivery
             ORDER BY user_id, notification_id",
        )?;
        let deliveries = stmt
            .query_map([], |row| {
                Ok(NotificationDelivery {
                    user_id: row.get(0)?,
                    notification_id: row.get(1)?,
                    read: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(deliveries)
    }

    fn unread_for_user(&self, user_id: i64) -> AppResult<Vec<Notification>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT n.id, n.title, n.body
             FROM notification n
             JOIN notification_delivery d ON d.notification_id = n.id
             WHERE d.user_id = ?1 AND d.read = 0
             ORDER BY n.id",
        )?;
        let notifications = stmt
            .query_map(params![user_id], Self::row_to_notification)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notifications)
    }

    fn refresh(&self) -> AppResult<()> {
        self.republish_notifications()?;
        self.republish_deliveries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_in_memory_pool, initialize_database};
    use crate::domain::User;
    use crate::repositories::{SqliteUserRepository, UserRepository};
    use crate::state::SourceSet;

    fn fixture() -> (SqliteNotificationRepository, i64) {
        let pool = Arc::new(create_in_memory_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        let sources = SourceSet::new();

        let users = SqliteUserRepository::new(Arc::clone(&pool), sources.users.clone());
        let user_id = users.insert(&User::new("mario")).unwrap();

        (
            SqliteNotificationRepository::new(
                pool,
                sources.notifications.clone(),
                sources.notification_deliveries.clone(),
            ),
            user_id,
        )
    }

    #[test]
    fn test_delivery_starts_unread() {
        let (repo, user_id) = fixture();

        let id = repo.create("Trofeo Sbloccato", "Complimenti!").unwrap();
        repo.deliver(user_id, id).unwrap();

        let unread = repo.unread_for_user(user_id).unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].title, "Trofeo Sbloccato");
    }

    #[test]
    fn test_mark_read_clears_unread() {
        let (repo, user_id) = fixture();

        let id = repo.create("Titolo", "Testo").unwrap();
        repo.deliver(user_id, id).unwrap();
        repo.mark_read(user_id, id).unwrap();

        assert!(repo.unread_for_user(user_id).unwrap().is_empty());
        // the delivery row survives with read set
        let deliveries = repo.list_deliveries().unwrap();
        assert_eq!(deliveries.len(), 1);
        assert!(deliveries[0].read);
    }

    #[test]
    fn test_mark_all_read() {
        let (repo, user_id) = fixture();

        for n in 0..3 {
            let id = repo.create(&format!("Titolo {n}"), "Testo").unwrap();
            repo.deliver(user_id, id).unwrap();
        }
        repo.mark_all_read(user_id).unwrap();

        assert!(repo.unread_for_user(user_id).unwrap().is_empty());
    }
}
