// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod catalog_service;
pub mod follow_service;
pub mod notification_service;
pub mod request_service;
pub mod trophy_service;
pub mod watch_service;

#[cfg(test)]
mod trophy_service_tests;

// Re-export all services and their types
pub use catalog_service::{AddContentRequest, CatalogService};
pub use follow_service::FollowService;
pub use notification_service::NotificationService;
pub use request_service::RequestService;
pub use trophy_service::TrophyService;
pub use watch_service::WatchService;
