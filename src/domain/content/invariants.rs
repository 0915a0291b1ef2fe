use super::entity::{Film, Series};
use crate::domain::{DomainError, DomainResult};

/// Validates all Film invariants
pub fn validate_film(film: &Film) -> DomainResult<()> {
    validate_title(&film.title)?;
    validate_stars(film.stars)?;
    Ok(())
}

/// Validates all Series invariants
pub fn validate_series(series: &Series) -> DomainResult<()> {
    validate_title(&series.title)?;
    validate_stars(series.stars)?;
    Ok(())
}

fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "content title must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Star ratings are whole stars, 0 (unrated) through 5
pub fn validate_stars(stars: i32) -> DomainResult<()> {
    if !(0..=5).contains(&stars) {
        return Err(DomainError::RatingOutOfRange { stars });
    }
    Ok(())
}
