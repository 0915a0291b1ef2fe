// src/domain/trophy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable key identifying a trophy's unlock rule
///
/// Dispatching on this key instead of the display name means renaming a
/// trophy in the catalog cannot silently disable its rule. The key is
/// persisted as text alongside the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrophyRule {
    /// First film or series ever watched
    FirstWatch,
    /// Ten distinct films watched
    FilmBuff,
    /// 600 minutes of total watch time
    Marathoner,
    /// Five distinct categories watched
    Explorer,
    /// Fifty items watched in total
    LoyalViewer,
    /// Has rated content (stub: no rating records exist yet)
    Critic,
    /// Has watched at night (stub: watch rows carry no timestamp)
    NightOwl,
    /// Has watched on a weekend (stub: watch rows carry no timestamp)
    WeekendWarrior,
    /// Has completed a series (approximated by watched-series count)
    Collector,
    /// Ten followers
    Social,
    /// Persisted key this build does not know; never unlocks
    Unknown,
}

impl TrophyRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrophyRule::FirstWatch => "first_watch",
            TrophyRule::FilmBuff => "film_buff",
            TrophyRule::Marathoner => "marathoner",
            TrophyRule::Explorer => "explorer",
            TrophyRule::LoyalViewer => "loyal_viewer",
            TrophyRule::Critic => "critic",
            TrophyRule::NightOwl => "night_owl",
            TrophyRule::WeekendWarrior => "weekend_warrior",
            TrophyRule::Collector => "collector",
            TrophyRule::Social => "social",
            TrophyRule::Unknown => "unknown",
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key {
            "first_watch" => TrophyRule::FirstWatch,
            "film_buff" => TrophyRule::FilmBuff,
            "marathoner" => TrophyRule::Marathoner,
            "explorer" => TrophyRule::Explorer,
            "loyal_viewer" => TrophyRule::LoyalViewer,
            "critic" => TrophyRule::Critic,
            "night_owl" => TrophyRule::NightOwl,
            "weekend_warrior" => TrophyRule::WeekendWarrior,
            "collector" => TrophyRule::Collector,
            "social" => TrophyRule::Social,
            _ => TrophyRule::Unknown,
        }
    }
}

/// A catalog entry describing an unlockable achievement
///
/// Seeded once at schema creation; immutable afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trophy {
    pub id: i64,
    pub name: String,
    pub rule: TrophyRule,
}

/// The durable record that a user unlocked a trophy
///
/// At most one row per (user, trophy) pair; the storage layer's composite
/// primary key enforces this, not the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub user_id: i64,
    pub trophy_id: i64,
    pub unlocked_at: DateTime<Utc>,
}
