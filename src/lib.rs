//! # procminer
//!
//! Combinable aggregation of process-mining event logs.
//!
//! An event log is folded into three artifacts: a [`LogSummary`] (counts,
//! case duration and size distributions, daily histogram), an
//! [`ActivityClassOverview`] (duration statistics per activity class) and
//! a [`SocialNetwork`] of originator hand-offs. Every intermediate result
//! implements [`Combine`], so the same answer comes out whether the stream
//! is folded in one pass or split into partitions folded in parallel.
//!
//! ## Usage
//!
//! ```bash
//! procminer analyze events.jsonl --time-unit minute --partitions 4
//! ```
//!
//! ## Modules
//!
//! - `config` - Analysis parameters, TOML and environment loading
//! - `core` - Pure accumulators, grouping and the partitioned fold
//! - `engine` - Two-phase driver producing a [`LogAnalysis`]
//! - `error` - Error type with numeric codes
//! - `input` - JSON Lines event reader
//! - `model` - Events, process instances and identifiers
//! - `report` - Text and JSON rendering
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod input;
pub mod model;
pub mod report;

pub use crate::config::{AnalysisConfig, DayBucketZone, TimeUnit};
pub use crate::core::{
    ActivityClassOverview, Combine, LogSummary, LogSummaryBuilder, RunningStats, SocialNetwork,
};
pub use crate::engine::{LogAnalysis, LogAnalyzer};
pub use crate::error::{ProcMinerError, Result};
pub use crate::model::{ActivityClass, CaseId, Event, Originator, ProcessInstance, TimeFrame};
