// src/services/catalog_service.rs
//
// Catalog Service - Content Insertion with Cast and Platform Wiring
//
// CRITICAL RULES:
// - The only path that creates Film and Series rows
// - Actors and platforms are found-or-created, never duplicated
// - Platform lookup is case-insensitive

use std::sync::Arc;

use crate::domain::{validate_film, validate_series, Actor, Film, Platform, Series};
use crate::error::AppResult;
use crate::repositories::{CastRepository, FilmRepository, PlatformRepository, SeriesRepository};

/// Request to insert catalog content, shared by films and series
#[derive(Debug, Clone, Default)]
pub struct AddContentRequest {
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    pub category: String,
    /// False for request-submitted content awaiting approval
    pub visible: bool,
    /// Platform names; matched case-insensitively against existing rows
    pub platforms: Vec<String>,
    /// (first name, last name) pairs
    pub actors: Vec<(String, String)>,
}

pub struct CatalogService {
    film_repo: Arc<dyn FilmRepository>,
    series_repo: Arc<dyn SeriesRepository>,
    cast_repo: Arc<dyn CastRepository>,
    platform_repo: Arc<dyn PlatformRepository>,
}

impl CatalogService {
    pub fn new(
        film_repo: Arc<dyn FilmRepository>,
        series_repo: Arc<dyn SeriesRepository>,
        cast_repo: Arc<dyn CastRepository>,
        platform_repo: Arc<dyn PlatformRepository>,
    ) -> Self {
        Self {
            film_repo,
            series_repo,
            cast_repo,
            platform_repo,
        }
    }

    /// Insert a film with its cast and platform links
    pub fn add_film(&self, request: AddContentRequest) -> AppResult<i64> {
        let mut film = Film::new(
            request.title.clone(),
            request.duration_minutes,
            request.category.clone(),
        );
        film.description = request.description.clone();
        film.visible = request.visible;
        film.cast_count = request.actors.len() as u32;
        validate_film(&film)?;

        let film_id = self.film_repo.insert(&film)?;

        for name in &request.platforms {
            let platform_id = self.find_or_create_platform(name)?;
            self.platform_repo.link_film(film_id, platform_id)?;
        }
        for (first, last) in &request.actors {
            let actor_id = self.find_or_create_actor(first, last)?;
            self.cast_repo.link_film_actor(film_id, actor_id)?;
        }

        Ok(film_id)
    }

    /// Insert a series with its cast and platform links
    pub fn add_series(&self, request: AddContentRequest) -> AppResult<i64> {
        let mut series = Series::new(
            request.title.clone(),
            request.duration_minutes,
            request.category.clone(),
        );
        series.description = request.description.clone();
        series.visible = request.visible;
        series.cast_count = request.actors.len() as u32;
        validate_series(&series)?;

        let series_id = self.series_repo.insert(&series)?;

        for name in &request.platforms {
            let platform_id = self.find_or_create_platform(name)?;
            self.platform_repo.link_series(series_id, platform_id)?;
        }
        for (first, last) in &request.actors {
            let actor_id = self.find_or_create_actor(first, last)?;
            self.cast_repo.link_series_actor(series_id, actor_id)?;
        }

        Ok(series_id)
    }

    /// Remove a film together with its cast and platform links
    pub fn remove_film(&self, film_id: i64) -> AppResult<()> {
        self.cast_repo.unlink_film_actors(film_id)?;
        self.platform_repo.unlink_film(film_id)?;
        self.film_repo.delete(film_id)
    }

    /// Remove a series together with its cast and platform links
    pub fn remove_series(&self, series_id: i64) -> AppResult<()> {
        self.cast_repo.unlink_series_actors(series_id)?;
        self.platform_repo.unlink_series(series_id)?;
        self.series_repo.delete(series_id)
    }

    fn find_or_create_platform(&self, name: &str) -> AppResult<i64> {
        match self.platform_repo.find_by_name(name)? {
            Some(platform) => Ok(platform.id),
            None => self.platform_repo.insert(&Platform {
                id: 0,
                name: name.to_string(),
            }),
        }
    }

    fn find_or_create_actor(&self, first_name: &str, last_name: &str) -> AppResult<i64> {
        match self.cast_repo.find_actor_by_name(first_name, last_name)? {
            Some(actor) => Ok(actor.id),
            None => self.cast_repo.insert_actor(&Actor {
                id: 0,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            }),
        }
    }
}
