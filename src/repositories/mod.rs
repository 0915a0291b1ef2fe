// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - Explicit SQL only
// - Every write republishes the whole table to its collection source

pub mod film_repository;
pub mod series_repository;
pub mod user_repository;
pub mod watch_repository;
pub mod request_repository;
pub mod trophy_repository;
pub mod achievement_repository;
pub mod notification_repository;
pub mod follower_repository;
pub mod cinema_repository;
pub mod cast_repository;
pub mod platform_repository;

pub use film_repository::{FilmRepository, SqliteFilmRepository};
pub use series_repository::{SeriesRepository, SqliteSeriesRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};
pub use watch_repository::{SqliteWatchHistoryRepository, WatchHistoryRepository};
pub use request_repository::{RequestRepository, SqliteRequestRepository};
pub use trophy_repository::{SqliteTrophyRepository, TrophyRepository};
pub use achievement_repository::{AchievementRepository, SqliteAchievementRepository};
pub use notification_repository::{NotificationRepository, SqliteNotificationRepository};
pub use follower_repository::{FollowerRepository, SqliteFollowerRepository};
pub use cinema_repository::{CinemaRepository, SqliteCinemaRepository};
pub use cast_repository::{CastRepository, SqliteCastRepository};
pub use platform_repository::{PlatformRepository, SqlitePlatformRepository};
