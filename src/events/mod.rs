// src/events/mod.rs
//
// Internal Event System - Public API

pub mod bus;
pub mod types;

pub use bus::{EventBus, EventLogEntry};
pub use types::{
    ContentRated, ContentUnwatched, ContentWatched, DomainEvent, FollowerAdded, FollowerRemoved,
    NotificationCreated, RequestApproved, RequestRejected, RequestSubmitted, TrophyUnlocked,
};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
