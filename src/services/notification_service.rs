// src/services/notification_service.rs
//
// Notification Service - In-App Notification Management
//
// CRITICAL RULES:
// - The only path that creates notification records
// - One record plus one delivery row per recipient
// - Emits NotificationCreated after both rows exist

use std::sync::Arc;

use crate::error::AppResult;
use crate::events::{EventBus, NotificationCreated};
use crate::domain::Notification;
use crate::repositories::NotificationRepository;

pub struct NotificationService {
    notification_repo: Arc<dyn NotificationRepository>,
    event_bus: Arc<EventBus>,
}

impl NotificationService {
    pub fn new(notification_repo: Arc<dyn NotificationRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            notification_repo,
            event_bus,
        }
    }

    /// Create a notification and deliver it to one user
    pub fn notify(&self, user_id: i64, title: &str, body: &str) -> AppResult<i64> {
        let notification_id = self.notification_repo.create(title, body)?;
        self.notification_repo.deliver(user_id, notification_id)?;

        self.event_bus.emit(NotificationCreated::new(
            notification_id,
            user_id,
            title.to_string(),
            body.to_string(),
        ));

        Ok(notification_id)
    }

    pub fn mark_read(&self, user_id: i64, notification_id: i64) -> AppResult<()> {
        self.notification_repo.mark_read(user_id, notification_id)
    }

    pub fn mark_all_read(&self, user_id: i64) -> AppResult<()> {
        self.notification_repo.mark_all_read(user_id)
    }

    pub fn unread_for_user(&self, user_id: i64) -> AppResult<Vec<Notification>> {
        self.notification_repo.unread_for_user(user_id)
    }
}
