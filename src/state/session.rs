// src/state/session.rs

use std::sync::RwLock;

/// Session-scoped state: which user is signed in on this device
///
/// Set once by the login/navigation flow (single writer) and read by
/// screens and by trophy-evaluation callers. Kept outside the immutable
/// snapshot on purpose.
#[derive(Debug, Default)]
pub struct SessionContext {
    current_user: RwLock<Option<i64>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user_id: i64) {
        *self.current_user.write().unwrap() = Some(user_id);
    }

    pub fn sign_out(&self) {
        *self.current_user.write().unwrap() = None;
    }

    pub fn current_user(&self) -> Option<i64> {
        *self.current_user.read().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_and_out() {
        let session = SessionContext::new();
        assert_eq!(session.current_user(), None);

        session.sign_in(42);
        assert_eq!(session.current_user(), Some(42));

        session.sign_out();
        assert_eq!(session.current_user(), None);
    }
}
