// src/services/watch_service.rs
//
// Watch Service - Watch Tracking and Rating
//
// CRITICAL RULES:
// - Keeps the user's watch list and the history table in step
// - View counters move only when the watch state actually changes
// - Every successful watch triggers a trophy check for the watcher

use std::sync::Arc;

use crate::domain::{validate_stars, ContentKind};
use crate::error::{AppError, AppResult};
use crate::events::{ContentRated, ContentUnwatched, ContentWatched, EventBus};
use crate::repositories::{
    FilmRepository, SeriesRepository, UserRepository, WatchHistoryRepository,
};
use crate::services::TrophyService;

pub struct WatchService {
    user_repo: Arc<dyn UserRepository>,
    film_repo: Arc<dyn FilmRepository>,
    series_repo: Arc<dyn SeriesRepository>,
    watch_repo: Arc<dyn WatchHistoryRepository>,
    trophies: Arc<TrophyService>,
    event_bus: Arc<EventBus>,
}

impl WatchService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        film_repo: Arc<dyn FilmRepository>,
        series_repo: Arc<dyn SeriesRepository>,
        watch_repo: Arc<dyn WatchHistoryRepository>,
        trophies: Arc<TrophyService>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            user_repo,
            film_repo,
            series_repo,
            watch_repo,
            trophies,
            event_bus,
        }
    }

    /// Mark a film as watched by the user
    ///
    /// Returns false when the film was already watched; nothing moves in
    /// that case. A successful mark bumps the film's view counter and
    /// runs the trophy check.
    pub fn watch_film(&self, user_id: i64, film_id: i64) -> AppResult<bool> {
        let mut user = self.user_repo.get_by_id(user_id)?.ok_or(AppError::NotFound)?;
        self.film_repo.get_by_id(film_id)?.ok_or(AppError::NotFound)?;

        if user.has_watched_film(film_id) || !self.watch_repo.mark_film(user_id, film_id)? {
            return Ok(false);
        }

        user.watched_films.push(film_id);
        self.user_repo.save(&user)?;
        self.film_repo.increment_views(film_id)?;

        self.event_bus
            .emit(ContentWatched::new(user_id, film_id, ContentKind::Film));
        self.trophies.check_and_unlock(user_id)?;

        Ok(true)
    }

    /// Remove a film watch mark
    ///
    /// Trophies are never revoked; unwatching only rolls back the list
    /// entry and the view counter.
    pub fn unwatch_film(&self, user_id: i64, film_id: i64) -> AppResult<bool> {
        let mut user = self.user_repo.get_by_id(user_id)?.ok_or(AppError::NotFound)?;

        if !self.watch_repo.unmark_film(user_id, film_id)? {
            return Ok(false);
        }

        user.watched_films.retain(|&id| id != film_id);
        self.user_repo.save(&user)?;
        self.film_repo.decrement_views(film_id)?;

        self.event_bus
            .emit(ContentUnwatched::new(user_id, film_id, ContentKind::Film));

        Ok(true)
    }

    /// Mark a series as watched by the user
    pub fn watch_series(&self, user_id: i64, series_id: i64) -> AppResult<bool> {
        let mut user = self.user_repo.get_by_id(user_id)?.ok_or(AppError::NotFound)?;
        self.series_repo
            .get_by_id(series_id)?
            .ok_or(AppError::NotFound)?;

        if user.has_watched_series(series_id) || !self.watch_repo.mark_series(user_id, series_id)? {
            return Ok(false);
        }

        user.watched_series.push(series_id);
        self.user_repo.save(&user)?;
        self.series_repo.increment_views(series_id)?;

        self.event_bus
            .emit(ContentWatched::new(user_id, series_id, ContentKind::Series));
        self.trophies.check_and_unlock(user_id)?;

        Ok(true)
    }

    /// Remove a series watch mark
    pub fn unwatch_series(&self, user_id: i64, series_id: i64) -> AppResult<bool> {
        let mut user = self.user_repo.get_by_id(user_id)?.ok_or(AppError::NotFound)?;

        if !self.watch_repo.unmark_series(user_id, series_id)? {
            return Ok(false);
        }

        user.watched_series.retain(|&id| id != series_id);
        self.user_repo.save(&user)?;
        self.series_repo.decrement_views(series_id)?;

        self.event_bus
            .emit(ContentUnwatched::new(user_id, series_id, ContentKind::Series));

        Ok(true)
    }

    /// Rate a film, replacing any previous rating
    pub fn rate_film(&self, user_id: i64, film_id: i64, stars: i32) -> AppResult<()> {
        validate_stars(stars)?;
        self.film_repo.get_by_id(film_id)?.ok_or(AppError::NotFound)?;

        self.film_repo.set_rating(film_id, stars)?;
        self.event_bus
            .emit(ContentRated::new(user_id, film_id, ContentKind::Film, stars));

        Ok(())
    }

    /// Rate a series, replacing any previous rating
    pub fn rate_series(&self, user_id: i64, series_id: i64, stars: i32) -> AppResult<()> {
        validate_stars(stars)?;
        self.series_repo
            .get_by_id(series_id)?
            .ok_or(AppError::NotFound)?;

        self.series_repo.set_rating(series_id, stars)?;
        self.event_bus.emit(ContentRated::new(
            user_id,
            series_id,
            ContentKind::Series,
            stars,
        ));

        Ok(())
    }
}
