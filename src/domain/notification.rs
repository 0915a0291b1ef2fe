// src/domain/notification.rs

use serde::{Deserialize, Serialize};

/// An in-app notification record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub body: String,
}

/// Links a notification to the user it was delivered to, with read state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDelivery {
    pub user_id: i64,
    pub notification_id: i64,
    pub read: bool,
}
