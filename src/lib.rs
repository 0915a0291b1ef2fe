// src/lib.rs
// Lookify - Film and TV watch tracking with trophies
//
// Architecture:
// - Domain-centric: business rules live in domain/ and trophies/
// - Snapshot-driven: repositories publish whole collections, the
//   aggregator combines them into immutable AppSnapshots
// - Event-driven: services announce facts on the EventBus
// - Explicit: no implicit behavior, no magic

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod app;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;
pub mod state;
pub mod trophies;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_film,
    validate_follow,
    validate_series,
    validate_stars,
    validate_user,
    // Trophies & Achievements
    Achievement,
    // Cast & Platforms
    Actor,
    // Cinemas
    Cinema,
    // Content
    ContentKind,
    Film,
    FilmActor,
    FilmPlatform,
    // Catalog Requests
    FilmRequest,
    // Social Graph
    Follower,
    NearbyCinema,
    // Notifications
    Notification,
    NotificationDelivery,
    Platform,
    Series,
    SeriesActor,
    SeriesPlatform,
    SeriesRequest,
    Trophy,
    TrophyRule,
    // Users
    User,
    // Watch History
    WatchedFilm,
    WatchedSeries,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus, ContentRated, ContentUnwatched, ContentWatched, DomainEvent, EventBus,
    FollowerAdded, FollowerRemoved, NotificationCreated, RequestApproved, RequestRejected,
    RequestSubmitted, TrophyUnlocked,
};

// ============================================================================
// PUBLIC API - State & Composition Root
// ============================================================================

pub use app::LookifyApp;
pub use state::{AppSnapshot, SessionContext, StateAggregator};
pub use trophies::{evaluate, UserStats};
