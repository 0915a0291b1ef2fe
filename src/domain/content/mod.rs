// src/domain/content/mod.rs

pub mod entity;
pub mod invariants;

pub use entity::{ContentKind, Film, Series};
pub use invariants::{validate_film, validate_series, validate_stars};
