//! Core aggregation logic with pure functions
//!
//! Following the "functional core, imperative shell" pattern, nothing in
//! this module reads files or spawns work on its own. Every aggregate is a
//! value implementing [`Combine`], built from events or process instances
//! and merged without touching either operand.

pub mod combine;
pub mod grouping;
pub mod mapreduce;
pub mod overview;
pub mod sna;
pub mod stats;
pub mod summary;

pub use combine::{fold_all, parallel_combine, Combine, CountMap, Grouped};
pub use grouping::{group_by_case, CaseGroups};
pub use mapreduce::{distribute, map_reduce, Partition};
pub use overview::{ActivityClassOverview, ActivityDurations};
pub use sna::{Handover, SocialNetwork};
pub use stats::{RunningStats, StatsSnapshot};
pub use summary::{CaseTally, EventTally, LogSummary, LogSummaryBuilder};
