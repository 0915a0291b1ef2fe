// src/domain/social.rs

use crate::domain::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// Directed follow edge: `follower_id` follows `followed_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follower {
    pub follower_id: i64,
    pub followed_id: i64,
}

/// A follow edge must connect two distinct users
pub fn validate_follow(follower_id: i64, followed_id: i64) -> DomainResult<()> {
    if follower_id == followed_id {
        return Err(DomainError::SelfFollow);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_follow_rejected() {
        assert!(validate_follow(7, 7).is_err());
        assert!(validate_follow(7, 8).is_ok());
    }
}
