// src/domain/platform.rs

use serde::{Deserialize, Serialize};

/// A streaming platform carrying catalog content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmPlatform {
    pub film_id: i64,
    pub platform_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPlatform {
    pub series_id: i64,
    pub platform_id: i64,
}
