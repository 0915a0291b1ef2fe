// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ContentKind;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! impl_domain_event {
    ($event:ident, $name:literal) => {
        impl DomainEvent for $event {
            fn event_id(&self) -> Uuid {
                self.event_id
            }
            fn occurred_at(&self) -> DateTime<Utc> {
                self.occurred_at
            }
            fn event_type(&self) -> &'static str {
                $name
            }
        }
    };
}

// ============================================================================
// WATCH TRACKING EVENTS
// ============================================================================

/// Emitted when a user marks a film or series as watched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentWatched {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: i64,
    pub content_id: i64,
    pub kind: ContentKind,
}

impl ContentWatched {
    pub fn new(user_id: i64, content_id: i64, kind: ContentKind) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            content_id,
            kind,
        }
    }
}

impl_domain_event!(ContentWatched, "ContentWatched");

/// Emitted when a watch mark is removed again
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentUnwatched {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: i64,
    pub content_id: i64,
    pub kind: ContentKind,
}

impl ContentUnwatched {
    pub fn new(user_id: i64, content_id: i64, kind: ContentKind) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            content_id,
            kind,
        }
    }
}

impl_domain_event!(ContentUnwatched, "ContentUnwatched");

/// Emitted when a user rates content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: i64,
    pub content_id: i64,
    pub kind: ContentKind,
    pub stars: i32,
}

impl ContentRated {
    pub fn new(user_id: i64, content_id: i64, kind: ContentKind, stars: i32) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            content_id,
            kind,
            stars,
        }
    }
}

impl_domain_event!(ContentRated, "ContentRated");

// ============================================================================
// TROPHY EVENTS
// ============================================================================

/// Emitted once per trophy actually persisted for a user
///
/// Not emitted when a concurrent trigger loses the insert race; the
/// winning trigger already announced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrophyUnlocked {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: i64,
    pub trophy_id: i64,
    pub trophy_name: String,
}

impl TrophyUnlocked {
    pub fn new(user_id: i64, trophy_id: i64, trophy_name: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            trophy_id,
            trophy_name,
        }
    }
}

impl_domain_event!(TrophyUnlocked, "TrophyUnlocked");

// ============================================================================
// NOTIFICATION EVENTS
// ============================================================================

/// Emitted when an in-app notification record is created
///
/// The platform layer subscribes to this to show a system notification;
/// delivery itself is outside the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub notification_id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

impl NotificationCreated {
    pub fn new(notification_id: i64, user_id: i64, title: String, body: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            notification_id,
            user_id,
            title,
            body,
        }
    }
}

impl_domain_event!(NotificationCreated, "NotificationCreated");

// ============================================================================
// SOCIAL EVENTS
// ============================================================================

/// Emitted when a follow edge is created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowerAdded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub follower_id: i64,
    pub followed_id: i64,
}

impl FollowerAdded {
    pub fn new(follower_id: i64, followed_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            follower_id,
            followed_id,
        }
    }
}

impl_domain_event!(FollowerAdded, "FollowerAdded");

/// Emitted when a follow edge is removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowerRemoved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub follower_id: i64,
    pub followed_id: i64,
}

impl FollowerRemoved {
    pub fn new(follower_id: i64, followed_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            follower_id,
            followed_id,
        }
    }
}

impl_domain_event!(FollowerRemoved, "FollowerRemoved");

// ============================================================================
// CATALOG REQUEST EVENTS
// ============================================================================

/// Emitted when a user submits a new catalog request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSubmitted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub request_id: i64,
    pub kind: ContentKind,
    pub requester_id: i64,
}

impl RequestSubmitted {
    pub fn new(request_id: i64, kind: ContentKind, requester_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            request_id,
            kind,
            requester_id,
        }
    }
}

impl_domain_event!(RequestSubmitted, "RequestSubmitted");

/// Emitted when an admin approves a request; the content became visible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestApproved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub request_id: i64,
    pub kind: ContentKind,
    pub requester_id: i64,
}

impl RequestApproved {
    pub fn new(request_id: i64, kind: ContentKind, requester_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            request_id,
            kind,
            requester_id,
        }
    }
}

impl_domain_event!(RequestApproved, "RequestApproved");

/// Emitted when an admin rejects a request; the content was removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRejected {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub request_id: i64,
    pub kind: ContentKind,
    pub requester_id: i64,
}

impl RequestRejected {
    pub fn new(request_id: i64, kind: ContentKind, requester_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            request_id,
            kind,
            requester_id,
        }
    }
}

impl_domain_event!(RequestRejected, "RequestRejected");
