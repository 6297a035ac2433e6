//! Per-activity-class duration statistics

use super::combine::{Combine, Grouped};
use super::stats::RunningStats;
use crate::config::TimeUnit;
use crate::error::Result;
use crate::model::{ActivityClass, Event, ProcessInstance};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Partition-local duration statistics per activity class
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityDurations {
    stats: Grouped<ActivityClass, RunningStats>,
}

impl ActivityDurations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event's duration into its class
    pub fn observe(&mut self, event: &Event, unit: TimeUnit) -> Result<()> {
        self.record(event.activity().clone(), event.duration(unit))
    }

    /// Fold a duration into `class`; on error nothing is stored
    pub fn record(&mut self, class: ActivityClass, duration: f64) -> Result<()> {
        let updated = match self.stats.get(&class) {
            Some(stats) => stats.observe(duration)?,
            None => RunningStats::identity().observe(duration)?,
        };
        self.stats.insert(class, updated);
        Ok(())
    }

    pub fn from_events<'a, I>(events: I, unit: TimeUnit) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut durations = Self::new();
        for event in events {
            durations.observe(event, unit)?;
        }
        Ok(durations)
    }

    pub fn finish(self, unit: TimeUnit) -> ActivityClassOverview {
        debug!("Activity overview covers {} classes", self.stats.len());
        ActivityClassOverview {
            unit,
            stats: self.stats,
        }
    }
}

impl Combine for ActivityDurations {
    fn identity() -> Self {
        Self::default()
    }

    fn combine(&self, other: &Self) -> Self {
        Self {
            stats: self.stats.combine(&other.stats),
        }
    }
}

/// Duration distribution of every activity class seen in a log
///
/// Only observed classes have an entry, so every stored accumulator is
/// non-empty and the projections below are total over [`Self::classes`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityClassOverview {
    unit: TimeUnit,
    stats: Grouped<ActivityClass, RunningStats>,
}

impl ActivityClassOverview {
    /// Sequential build over an event stream
    pub fn build<'a, I>(events: I, unit: TimeUnit) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        Ok(ActivityDurations::from_events(events, unit)?.finish(unit))
    }

    pub fn from_instances<'a, I>(instances: I, unit: TimeUnit) -> Result<Self>
    where
        I: IntoIterator<Item = &'a ProcessInstance>,
    {
        Self::build(instances.into_iter().flat_map(|i| i.events()), unit)
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn get(&self, class: &ActivityClass) -> Option<&RunningStats> {
        self.stats.get(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ActivityClass> {
        self.stats.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ActivityClass, &RunningStats)> {
        self.stats.iter()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Occurrences per class
    pub fn frequency(&self) -> BTreeMap<ActivityClass, u64> {
        self.stats
            .iter()
            .map(|(class, stats)| (class.clone(), stats.count()))
            .collect()
    }

    pub fn mean_duration(&self) -> BTreeMap<ActivityClass, f64> {
        self.project(RunningStats::mean)
    }

    /// `max - min` per class
    pub fn range_duration(&self) -> BTreeMap<ActivityClass, f64> {
        self.project(RunningStats::range)
    }

    /// Total time spent per class
    pub fn aggregate_duration(&self) -> BTreeMap<ActivityClass, f64> {
        self.project(|s| Some(s.sum()))
    }

    fn project<F>(&self, f: F) -> BTreeMap<ActivityClass, f64>
    where
        F: Fn(&RunningStats) -> Option<f64>,
    {
        self.stats
            .iter()
            .filter_map(|(class, stats)| f(stats).map(|v| (class.clone(), v)))
            .collect()
    }
}
