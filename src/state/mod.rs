// src/state/mod.rs
//
// Reactive state aggregation.
//
// Every table has a CollectionSource that repositories republish into on
// each write; the StateAggregator combines the latest value of every
// source into one immutable AppSnapshot. Session-scoped state (current
// user) lives in SessionContext, outside the snapshot.

pub mod aggregator;
pub mod session;
pub mod snapshot;
pub mod source;

pub use aggregator::StateAggregator;
pub use session::SessionContext;
pub use snapshot::AppSnapshot;
pub use source::{CollectionSource, SourceSet};
