use super::entity::User;
use crate::domain::{DomainError, DomainResult};

/// Validates all User invariants
///
/// 1. Username is non-empty (it is the login identity)
/// 2. Watch lists never contain duplicate ids
pub fn validate_user(user: &User) -> DomainResult<()> {
    if user.username.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "username must not be empty".to_string(),
        ));
    }
    validate_no_duplicates(&user.watched_films, "watched_films")?;
    validate_no_duplicates(&user.watched_series, "watched_series")?;
    Ok(())
}

fn validate_no_duplicates(ids: &[i64], field: &str) -> DomainResult<()> {
    let mut seen = std::collections::HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(DomainError::InvariantViolation(format!(
                "{} contains duplicate id {}",
                field, id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user() {
        let user = User::new("mario.rossi");
        assert!(validate_user(&user).is_ok());
    }

    #[test]
    fn test_empty_username_fails() {
        let user = User::new("");
        assert!(validate_user(&user).is_err());
    }

    #[test]
    fn test_duplicate_watch_list_entry_fails() {
        let mut user = User::new("mario.rossi");
        user.watched_films = vec![1, 2, 2];
        assert!(validate_user(&user).is_err());
    }
}
