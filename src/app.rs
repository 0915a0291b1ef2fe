// src/app.rs
//
// Composition root: builds the pool, wires every repository to its
// collection source, and hands the shared services out behind Arcs.
//
// CRITICAL RULES:
// - Wiring happens exactly once, here
// - Every source is seeded by refresh_all() before the app is returned,
//   so the aggregator never stalls on a fresh start
// - The aggregator's background task is started explicitly by the caller
//   (it needs a tokio runtime)

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::db::{
    create_connection_pool, create_in_memory_pool, get_connection, initialize_database,
    ConnectionPool,
};
use crate::error::AppResult;
use crate::events::{create_event_bus, EventBus};
use crate::repositories::{
    AchievementRepository, CastRepository, CinemaRepository, FilmRepository, FollowerRepository,
    NotificationRepository, PlatformRepository, RequestRepository, SeriesRepository,
    SqliteAchievementRepository, SqliteCastRepository, SqliteCinemaRepository,
    SqliteFilmRepository, SqliteFollowerRepository, SqliteNotificationRepository,
    SqlitePlatformRepository, SqliteRequestRepository, SqliteSeriesRepository,
    SqliteTrophyRepository, SqliteUserRepository, SqliteWatchHistoryRepository, TrophyRepository,
    UserRepository, WatchHistoryRepository,
};
use crate::services::{
    CatalogService, FollowService, NotificationService, RequestService, TrophyService,
    WatchService,
};
use crate::state::{SessionContext, SourceSet, StateAggregator};

pub struct LookifyApp {
    pub pool: Arc<ConnectionPool>,
    pub sources: SourceSet,
    pub event_bus: Arc<EventBus>,
    pub aggregator: Arc<StateAggregator>,
    pub session: Arc<SessionContext>,

    // Repositories
    pub user_repo: Arc<dyn UserRepository>,
    pub film_repo: Arc<dyn FilmRepository>,
    pub series_repo: Arc<dyn SeriesRepository>,
    pub watch_repo: Arc<dyn WatchHistoryRepository>,
    pub request_repo: Arc<dyn RequestRepository>,
    pub trophy_repo: Arc<dyn TrophyRepository>,
    pub achievement_repo: Arc<dyn AchievementRepository>,
    pub notification_repo: Arc<dyn NotificationRepository>,
    pub follower_repo: Arc<dyn FollowerRepository>,
    pub cinema_repo: Arc<dyn CinemaRepository>,
    pub cast_repo: Arc<dyn CastRepository>,
    pub platform_repo: Arc<dyn PlatformRepository>,

    // Services
    pub notifications: Arc<NotificationService>,
    pub trophies: Arc<TrophyService>,
    pub watch: Arc<WatchService>,
    pub follows: Arc<FollowService>,
    pub catalog: Arc<CatalogService>,
    pub requests: Arc<RequestService>,
}

impl LookifyApp {
    /// Open the application database at its default location
    pub fn new() -> AppResult<Self> {
        Self::with_pool(create_connection_pool()?)
    }

    /// Fully wired app on a private in-memory database (for tests)
    pub fn in_memory() -> AppResult<Self> {
        Self::with_pool(create_in_memory_pool()?)
    }

    fn with_pool(pool: ConnectionPool) -> AppResult<Self> {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;

        let pool = Arc::new(pool);
        let sources = SourceSet::new();
        let event_bus = Arc::new(create_event_bus());
        let session = Arc::new(SessionContext::new());

        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(
            Arc::clone(&pool),
            sources.users.clone(),
        ));
        let film_repo: Arc<dyn FilmRepository> = Arc::new(SqliteFilmRepository::new(
            Arc::clone(&pool),
            sources.films.clone(),
        ));
        let series_repo: Arc<dyn SeriesRepository> = Arc::new(SqliteSeriesRepository::new(
            Arc::clone(&pool),
            sources.series.clone(),
        ));
        let watch_repo: Arc<dyn WatchHistoryRepository> = Arc::new(
            SqliteWatchHistoryRepository::new(
                Arc::clone(&pool),
                sources.watched_films.clone(),
                sources.watched_series.clone(),
            ),
        );
        let request_repo: Arc<dyn RequestRepository> = Arc::new(SqliteRequestRepository::new(
            Arc::clone(&pool),
            sources.film_requests.clone(),
            sources.series_requests.clone(),
        ));
        let trophy_repo: Arc<dyn TrophyRepository> = Arc::new(SqliteTrophyRepository::new(
            Arc::clone(&pool),
            sources.trophies.clone(),
        ));
        let achievement_repo: Arc<dyn AchievementRepository> = Arc::new(
            SqliteAchievementRepository::new(Arc::clone(&pool), sources.achievements.clone()),
        );
        let notification_repo: Arc<dyn NotificationRepository> =
            Arc::new(SqliteNotificationRepository::new(
                Arc::clone(&pool),
                sources.notifications.clone(),
                sources.notification_deliveries.clone(),
            ));
        let follower_repo: Arc<dyn FollowerRepository> = Arc::new(SqliteFollowerRepository::new(
            Arc::clone(&pool),
            sources.followers.clone(),
        ));
        let cinema_repo: Arc<dyn CinemaRepository> = Arc::new(SqliteCinemaRepository::new(
            Arc::clone(&pool),
            sources.cinemas.clone(),
            sources.nearby_cinemas.clone(),
        ));
        let cast_repo: Arc<dyn CastRepository> = Arc::new(SqliteCastRepository::new(
            Arc::clone(&pool),
            sources.actors.clone(),
            sources.film_actors.clone(),
            sources.series_actors.clone(),
        ));
        let platform_repo: Arc<dyn PlatformRepository> = Arc::new(SqlitePlatformRepository::new(
            Arc::clone(&pool),
            sources.platforms.clone(),
            sources.film_platforms.clone(),
            sources.series_platforms.clone(),
        ));

        let aggregator = Arc::new(StateAggregator::new(sources.clone()));

        let notifications = Arc::new(NotificationService::new(
            Arc::clone(&notification_repo),
            Arc::clone(&event_bus),
        ));
        let trophies = Arc::new(TrophyService::new(
            Arc::clone(&achievement_repo),
            Arc::clone(&notifications),
            Arc::clone(&aggregator),
            Arc::clone(&event_bus),
        ));
        let watch = Arc::new(WatchService::new(
            Arc::clone(&user_repo),
            Arc::clone(&film_repo),
            Arc::clone(&series_repo),
            Arc::clone(&watch_repo),
            Arc::clone(&trophies),
            Arc::clone(&event_bus),
        ));
        let follows = Arc::new(FollowService::new(
            Arc::clone(&user_repo),
            Arc::clone(&follower_repo),
            Arc::clone(&notifications),
            Arc::clone(&trophies),
            Arc::clone(&event_bus),
        ));
        let catalog = Arc::new(CatalogService::new(
            Arc::clone(&film_repo),
            Arc::clone(&series_repo),
            Arc::clone(&cast_repo),
            Arc::clone(&platform_repo),
        ));
        let requests = Arc::new(RequestService::new(
            Arc::clone(&request_repo),
            Arc::clone(&film_repo),
            Arc::clone(&series_repo),
            Arc::clone(&catalog),
            Arc::clone(&notifications),
            Arc::clone(&event_bus),
        ));

        let app = Self {
            pool,
            sources,
            event_bus,
            aggregator,
            session,
            user_repo,
            film_repo,
            series_repo,
            watch_repo,
            request_repo,
            trophy_repo,
            achievement_repo,
            notification_repo,
            follower_repo,
            cinema_repo,
            cast_repo,
            platform_repo,
            notifications,
            trophies,
            watch,
            follows,
            catalog,
            requests,
        };

        app.refresh_all()?;
        Ok(app)
    }

    /// Publish the current contents of every table to its source
    pub fn refresh_all(&self) -> AppResult<()> {
        self.user_repo.refresh()?;
        self.film_repo.refresh()?;
        self.series_repo.refresh()?;
        self.watch_repo.refresh()?;
        self.request_repo.refresh()?;
        self.trophy_repo.refresh()?;
        self.achievement_repo.refresh()?;
        self.notification_repo.refresh()?;
        self.follower_repo.refresh()?;
        self.cinema_repo.refresh()?;
        self.cast_repo.refresh()?;
        self.platform_repo.refresh()?;
        Ok(())
    }

    /// Start the snapshot combination task; abort the handle to stop it
    pub fn spawn_aggregator(&self) -> JoinHandle<()> {
        Arc::clone(&self.aggregator).spawn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_app_is_fully_seeded() {
        let app = LookifyApp::in_memory().unwrap();

        // Every source has published, so combination succeeds immediately
        let snapshot = app.aggregator.current().expect("all sources seeded");
        assert_eq!(snapshot.trophies.len(), 10);
        assert!(snapshot.users.is_empty());
    }

    #[tokio::test]
    async fn test_aggregator_task_emits_after_write() {
        let app = LookifyApp::in_memory().unwrap();
        let mut rx = app.aggregator.subscribe();
        let handle = app.spawn_aggregator();

        app.user_repo
            .insert(&crate::domain::User::new("mario"))
            .unwrap();

        loop {
            rx.changed().await.unwrap();
            let snap = rx.borrow().clone();
            if let Some(snap) = snap {
                if snap.users.len() == 1 {
                    break;
                }
            }
        }

        handle.abort();
    }
}
