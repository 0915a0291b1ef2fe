// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file declares all domain modules and re-exports their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod cast;
pub mod cinema;
pub mod content;
pub mod notification;
pub mod platform;
pub mod request;
pub mod social;
pub mod trophy;
pub mod user;
pub mod watch;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Content Domain (films and series)
pub use content::{validate_film, validate_series, validate_stars, ContentKind, Film, Series};

// User Domain
pub use user::{validate_user, User};

// Watch History
pub use watch::{WatchedFilm, WatchedSeries};

// Catalog Requests
pub use request::{FilmRequest, SeriesRequest};

// Trophies & Achievements
pub use trophy::{Achievement, Trophy, TrophyRule};

// Notifications
pub use notification::{Notification, NotificationDelivery};

// Social Graph
pub use social::{validate_follow, Follower};

// Cinemas
pub use cinema::{Cinema, NearbyCinema};

// Cast & Platforms
pub use cast::{Actor, FilmActor, SeriesActor};
pub use platform::{FilmPlatform, Platform, SeriesPlatform};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Rating {stars} is out of range 0..=5")]
    RatingOutOfRange { stars: i32 },

    #[error("A user cannot follow themselves")]
    SelfFollow,

    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
