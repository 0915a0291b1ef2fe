// src/trophies/evaluator.rs

use std::collections::HashSet;

use crate::domain::TrophyRule;
use crate::state::AppSnapshot;
use crate::trophies::stats::UserStats;

/// Decide which trophies the user newly qualifies for
///
/// Pure and deterministic: same snapshot, same result. Returns the ids of
/// every trophy in the catalog that is not already unlocked and whose rule
/// holds against the user's current statistics. Persisting the unlocks is
/// the caller's responsibility.
///
/// A user id absent from the snapshot yields an empty result rather than
/// an error.
pub fn evaluate(user_id: i64, snapshot: &AppSnapshot) -> Vec<i64> {
    if snapshot.find_user(user_id).is_none() {
        return Vec::new();
    }

    let already_unlocked: HashSet<i64> = snapshot
        .achievements
        .iter()
        .filter(|a| a.user_id == user_id)
        .map(|a| a.trophy_id)
        .collect();

    let stats = UserStats::for_user(user_id, snapshot);

    snapshot
        .trophies
        .iter()
        .filter(|trophy| !already_unlocked.contains(&trophy.id))
        .filter(|trophy| rule_holds(trophy.rule, &stats))
        .map(|trophy| trophy.id)
        .collect()
}

/// The fixed rule table; thresholds match the seeded trophy catalog
fn rule_holds(rule: TrophyRule, stats: &UserStats) -> bool {
    match rule {
        TrophyRule::FirstWatch => stats.total_watched() >= 1,
        TrophyRule::FilmBuff => stats.watched_film_count >= 10,
        TrophyRule::Marathoner => stats.total_watch_minutes >= 600,
        TrophyRule::Explorer => stats.unique_categories.len() >= 5,
        TrophyRule::LoyalViewer => stats.total_watched() >= 50,
        TrophyRule::Critic => stats.has_rated_content,
        TrophyRule::NightOwl => stats.has_watched_at_night,
        TrophyRule::WeekendWarrior => stats.has_watched_on_weekend,
        TrophyRule::Collector => stats.has_completed_series(),
        TrophyRule::Social => stats.followers_count >= 10,
        TrophyRule::Unknown => false,
    }
}
