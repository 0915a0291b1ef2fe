// src/services/follow_service.rs
//
// Follow Service - Social Graph Management
//
// CRITICAL RULES:
// - Self-follows are rejected before touching storage
// - The followed user is notified only when the edge is actually new
// - A new follower triggers a trophy check for the FOLLOWED user

use std::sync::Arc;

use crate::domain::validate_follow;
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, FollowerAdded, FollowerRemoved};
use crate::repositories::{FollowerRepository, UserRepository};
use crate::services::{NotificationService, TrophyService};

pub struct FollowService {
    user_repo: Arc<dyn UserRepository>,
    follower_repo: Arc<dyn FollowerRepository>,
    notifications: Arc<NotificationService>,
    trophies: Arc<TrophyService>,
    event_bus: Arc<EventBus>,
}

impl FollowService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        follower_repo: Arc<dyn FollowerRepository>,
        notifications: Arc<NotificationService>,
        trophies: Arc<TrophyService>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            user_repo,
            follower_repo,
            notifications,
            trophies,
            event_bus,
        }
    }

    /// Create a follow edge
    ///
    /// Returns false when the edge already existed; nothing is notified
    /// or re-checked in that case.
    pub fn follow(&self, follower_id: i64, followed_id: i64) -> AppResult<bool> {
        validate_follow(follower_id, followed_id)?;

        let follower = self
            .user_repo
            .get_by_id(follower_id)?
            .ok_or(AppError::NotFound)?;
        self.user_repo
            .get_by_id(followed_id)?
            .ok_or(AppError::NotFound)?;

        if !self.follower_repo.follow(follower_id, followed_id)? {
            return Ok(false);
        }

        self.notifications.notify(
            followed_id,
            "Hai un nuovo follower!",
            &format!("L'utente {} ti ha iniziato a seguire!", follower.username),
        )?;
        self.event_bus
            .emit(FollowerAdded::new(follower_id, followed_id));
        self.trophies.check_and_unlock(followed_id)?;

        Ok(true)
    }

    /// Remove a follow edge
    ///
    /// Trophies already earned through follower count stay unlocked.
    pub fn unfollow(&self, follower_id: i64, followed_id: i64) -> AppResult<bool> {
        if !self.follower_repo.unfollow(follower_id, followed_id)? {
            return Ok(false);
        }

        self.event_bus
            .emit(FollowerRemoved::new(follower_id, followed_id));

        Ok(true)
    }

    pub fn followers_of(&self, followed_id: i64) -> AppResult<Vec<i64>> {
        self.follower_repo.followers_of(followed_id)
    }
}
