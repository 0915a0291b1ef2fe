// src/services/trophy_service.rs
//
// Trophy Service - Evaluate-Then-Apply Unlock Orchestration
//
// CRITICAL RULES:
// - Evaluation reads one immutable snapshot; it never queries tables
// - Only an actual achievement insert produces a notification and event
// - A stalled aggregator (some table never loaded) skips the check, it
//   never fails the triggering operation

use chrono::Utc;
use std::sync::Arc;

use crate::error::AppResult;
use crate::events::{EventBus, TrophyUnlocked};
use crate::repositories::AchievementRepository;
use crate::services::NotificationService;
use crate::state::StateAggregator;
use crate::trophies::evaluate;

pub struct TrophyService {
    achievement_repo: Arc<dyn AchievementRepository>,
    notifications: Arc<NotificationService>,
    aggregator: Arc<StateAggregator>,
    event_bus: Arc<EventBus>,
}

impl TrophyService {
    pub fn new(
        achievement_repo: Arc<dyn AchievementRepository>,
        notifications: Arc<NotificationService>,
        aggregator: Arc<StateAggregator>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            achievement_repo,
            notifications,
            aggregator,
            event_bus,
        }
    }

    /// Unlock every trophy the user newly qualifies for
    ///
    /// Returns the ids of the trophies actually inserted by this call.
    /// Candidates that lose the insert race to a concurrent check are
    /// skipped silently, so each trophy is announced exactly once.
    pub fn check_and_unlock(&self, user_id: i64) -> AppResult<Vec<i64>> {
        let snapshot = match self.aggregator.current() {
            Some(snapshot) => snapshot,
            None => {
                log::warn!(
                    "trophy check skipped for user {}: state not fully loaded",
                    user_id
                );
                return Ok(Vec::new());
            }
        };

        let mut unlocked = Vec::new();
        for trophy_id in evaluate(user_id, &snapshot) {
            if !self.achievement_repo.unlock(user_id, trophy_id, Utc::now())? {
                continue;
            }

            let name = snapshot
                .find_trophy(trophy_id)
                .map(|t| t.name.clone())
                .unwrap_or_default();

            self.notifications.notify(
                user_id,
                "Trofeo Sbloccato",
                &format!("Complimenti hai sbloccato il trofeo {}!", name),
            )?;
            self.event_bus.emit(TrophyUnlocked::new(user_id, trophy_id, name));

            unlocked.push(trophy_id);
        }

        Ok(unlocked)
    }
}
