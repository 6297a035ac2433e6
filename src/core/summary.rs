//! Log summary
//!
//! A [`LogSummary`] is assembled in one step from two combinable partials:
//! [`EventTally`] (per-event counts, folded over event partitions) and
//! [`CaseTally`] (per-instance statistics, folded over instance partitions).
//! Nothing is exposed until both partials are complete.

use super::combine::{Combine, CountMap, Grouped};
use super::grouping::CaseGroups;
use super::stats::RunningStats;
use crate::config::{DayBucketZone, TimeUnit};
use crate::error::Result;
use crate::model::{ActivityClass, Event, Originator, ProcessInstance, TimeFrame};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

/// Event-level counts of one partition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTally {
    pub events: u64,
    pub activity_occurrences: CountMap<ActivityClass>,
    pub events_per_day: CountMap<NaiveDate>,
    pub originator_occurrences: CountMap<Originator>,
    pub originator_activities: Grouped<Originator, CountMap<ActivityClass>>,
}

impl EventTally {
    pub fn observe(&mut self, event: &Event, zone: &DayBucketZone) {
        self.events += 1;
        self.activity_occurrences.increment(event.activity().clone());
        self.events_per_day.increment(zone.day_of(event.local_start()));
        self.originator_occurrences
            .increment(event.originator().clone());
        self.originator_activities
            .entry_mut(event.originator().clone())
            .increment(event.activity().clone());
    }

    pub fn from_events<'a, I>(events: I, zone: &DayBucketZone) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut tally = Self::default();
        for event in events {
            tally.observe(event, zone);
        }
        tally
    }
}

impl Combine for EventTally {
    fn identity() -> Self {
        Self::default()
    }

    fn combine(&self, other: &Self) -> Self {
        Self {
            events: self.events.combine(&other.events),
            activity_occurrences: self.activity_occurrences.combine(&other.activity_occurrences),
            events_per_day: self.events_per_day.combine(&other.events_per_day),
            originator_occurrences: self
                .originator_occurrences
                .combine(&other.originator_occurrences),
            originator_activities: self
                .originator_activities
                .combine(&other.originator_activities),
        }
    }
}

/// Instance-level statistics of one partition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseTally {
    pub instances: u64,
    pub durations: RunningStats,
    pub sizes: RunningStats,
    pub time_frame: Option<TimeFrame>,
    pub starting_activities: CountMap<ActivityClass>,
    pub ending_activities: CountMap<ActivityClass>,
}

impl CaseTally {
    pub fn observe(&mut self, instance: &ProcessInstance, unit: TimeUnit) -> Result<()> {
        self.durations.push(instance.duration(unit))?;
        self.sizes.push(instance.size() as f64)?;
        self.instances += 1;
        self.time_frame = self.time_frame.combine(&Some(instance.time_frame()));
        self.starting_activities
            .increment(instance.first_activity().clone());
        self.ending_activities
            .increment(instance.last_activity().clone());
        Ok(())
    }

    pub fn from_instances<'a, I>(instances: I, unit: TimeUnit) -> Result<Self>
    where
        I: IntoIterator<Item = &'a ProcessInstance>,
    {
        let mut tally = Self::default();
        for instance in instances {
            tally.observe(instance, unit)?;
        }
        Ok(tally)
    }
}

impl Combine for CaseTally {
    fn identity() -> Self {
        Self::default()
    }

    fn combine(&self, other: &Self) -> Self {
        Self {
            instances: self.instances.combine(&other.instances),
            durations: self.durations.combine(&other.durations),
            sizes: self.sizes.combine(&other.sizes),
            time_frame: self.time_frame.combine(&other.time_frame),
            starting_activities: self.starting_activities.combine(&other.starting_activities),
            ending_activities: self.ending_activities.combine(&other.ending_activities),
        }
    }
}

/// Immutable summary of one event log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogSummary {
    log_name: String,
    log_description: String,
    time_unit: TimeUnit,
    number_of_events: u64,
    number_of_process_instances: u64,
    time_frame: Option<TimeFrame>,
    case_duration_stats: RunningStats,
    case_size_stats: RunningStats,
    events_per_day: CountMap<NaiveDate>,
    event_class_occurrences: CountMap<ActivityClass>,
    starting_event_classes: CountMap<ActivityClass>,
    ending_event_classes: CountMap<ActivityClass>,
    originator_occurrences: CountMap<Originator>,
    originator_activity_occurrences: Grouped<Originator, CountMap<ActivityClass>>,
}

impl LogSummary {
    pub fn log_name(&self) -> &str {
        &self.log_name
    }

    pub fn log_description(&self) -> &str {
        &self.log_description
    }

    /// Unit of [`Self::case_duration_stats`]
    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    pub fn number_of_events(&self) -> u64 {
        self.number_of_events
    }

    pub fn number_of_process_instances(&self) -> u64 {
        self.number_of_process_instances
    }

    /// First start and last end over all instances; `None` for an empty log
    pub fn time_frame(&self) -> Option<TimeFrame> {
        self.time_frame
    }

    pub fn case_duration_stats(&self) -> &RunningStats {
        &self.case_duration_stats
    }

    pub fn case_size_stats(&self) -> &RunningStats {
        &self.case_size_stats
    }

    /// Events per calendar day of their start instant
    pub fn events_per_day(&self) -> &CountMap<NaiveDate> {
        &self.events_per_day
    }

    pub fn event_class_occurrences(&self) -> &CountMap<ActivityClass> {
        &self.event_class_occurrences
    }

    /// Instances per activity class of their first event
    pub fn starting_event_classes(&self) -> &CountMap<ActivityClass> {
        &self.starting_event_classes
    }

    /// Instances per activity class of their last event
    pub fn ending_event_classes(&self) -> &CountMap<ActivityClass> {
        &self.ending_event_classes
    }

    pub fn originator_occurrences(&self) -> &CountMap<Originator> {
        &self.originator_occurrences
    }

    pub fn originator_activity_occurrences(
        &self,
    ) -> &Grouped<Originator, CountMap<ActivityClass>> {
        &self.originator_activity_occurrences
    }

    /// Events `originator` performed of class `activity`
    pub fn originator_activity_count(
        &self,
        originator: &Originator,
        activity: &ActivityClass,
    ) -> u64 {
        self.originator_activity_occurrences
            .get(originator)
            .map(|counts| counts.count(activity))
            .unwrap_or(0)
    }

    /// Activity classes in name order
    pub fn activity_classes(&self) -> impl Iterator<Item = &ActivityClass> {
        self.event_class_occurrences.keys()
    }

    pub fn number_of_activities(&self) -> usize {
        self.event_class_occurrences.len()
    }

    /// Originators in name order
    pub fn originators(&self) -> impl Iterator<Item = &Originator> {
        self.originator_occurrences.keys()
    }
}

/// Assembles a [`LogSummary`] from completed partials
#[derive(Debug, Clone)]
pub struct LogSummaryBuilder {
    log_name: String,
    log_description: String,
    unit: TimeUnit,
    zone: DayBucketZone,
}

impl LogSummaryBuilder {
    pub fn new(log_name: impl Into<String>, log_description: impl Into<String>) -> Self {
        Self {
            log_name: log_name.into(),
            log_description: log_description.into(),
            unit: TimeUnit::default(),
            zone: DayBucketZone::default(),
        }
    }

    pub fn time_unit(mut self, unit: TimeUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn day_bucket(mut self, zone: DayBucketZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn zone(&self) -> &DayBucketZone {
        &self.zone
    }

    /// Single pass over the whole stream on the calling thread
    pub fn build(&self, events: &[Event]) -> Result<LogSummary> {
        let tally = EventTally::from_events(events, &self.zone);
        let instances = CaseGroups::from_slice(0, events).into_instances();
        let cases = CaseTally::from_instances(instances.values(), self.unit)?;
        Ok(self.finish(tally, cases))
    }

    pub fn finish(&self, events: EventTally, cases: CaseTally) -> LogSummary {
        info!(
            "Summarized '{}': {} events in {} cases",
            self.log_name, events.events, cases.instances
        );

        LogSummary {
            log_name: self.log_name.clone(),
            log_description: self.log_description.clone(),
            time_unit: self.unit,
            number_of_events: events.events,
            number_of_process_instances: cases.instances,
            time_frame: cases.time_frame,
            case_duration_stats: cases.durations,
            case_size_stats: cases.sizes,
            events_per_day: events.events_per_day,
            event_class_occurrences: events.activity_occurrences,
            starting_event_classes: cases.starting_activities,
            ending_event_classes: cases.ending_activities,
            originator_occurrences: events.originator_occurrences,
            originator_activity_occurrences: events.originator_activities,
        }
    }
}
