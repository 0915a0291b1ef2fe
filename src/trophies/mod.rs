// src/trophies/mod.rs
//
// Trophy unlock engine.
//
// Pure computation over an AppSnapshot: stats.rs derives per-user
// statistics, evaluator.rs applies each trophy's rule against them.
// Persisting unlocks and notifying the user is the TrophyService's job.

pub mod evaluator;
pub mod stats;

pub use evaluator::evaluate;
pub use stats::UserStats;
