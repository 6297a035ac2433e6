//! Case grouping
//!
//! Events are grouped by case id into [`ProcessInstance`]s. Partitions group
//! their own slice into a [`CaseGroups`] partial; partials merge by union, so
//! a case whose events are spread over several partitions still ends up in
//! exactly one instance.
//!
//! Ordering within an instance is by start timestamp, ties broken by the
//! event's global arrival index (its position in the original stream). The
//! arrival index travels with the event, which keeps the order independent
//! of how the stream was partitioned and merged.

use super::combine::Combine;
use crate::model::{CaseId, Event, ProcessInstance};
use std::collections::BTreeMap;
use tracing::trace;

/// Partition-local grouping state: events per case with their arrival index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseGroups {
    groups: BTreeMap<CaseId, Vec<(usize, Event)>>,
}

impl CaseGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group a whole stream, numbering events from zero
    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = Event>,
    {
        let mut groups = Self::new();
        for (arrival, event) in events.into_iter().enumerate() {
            groups.insert(arrival, event);
        }
        groups
    }

    /// Group one partition whose first event sits at `start_index` in the stream
    pub fn from_slice(start_index: usize, events: &[Event]) -> Self {
        let mut groups = Self::new();
        for (offset, event) in events.iter().enumerate() {
            groups.insert(start_index + offset, event.clone());
        }
        groups
    }

    pub fn insert(&mut self, arrival: usize, event: Event) {
        self.groups
            .entry(event.case_id().clone())
            .or_default()
            .push((arrival, event));
    }

    pub fn case_count(&self) -> usize {
        self.groups.len()
    }

    pub fn event_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Fold every group into its process instance
    pub fn into_instances(self) -> BTreeMap<CaseId, ProcessInstance> {
        trace!("Building {} process instances", self.groups.len());
        self.groups
            .into_iter()
            .filter_map(|(case_id, mut indexed)| {
                indexed.sort_by_key(|(arrival, event)| (event.start(), *arrival));
                let events = indexed.into_iter().map(|(_, event)| event).collect();
                ProcessInstance::from_ordered(case_id.clone(), events)
                    .map(|instance| (case_id, instance))
            })
            .collect()
    }
}

impl Combine for CaseGroups {
    fn identity() -> Self {
        Self::default()
    }

    fn combine(&self, other: &Self) -> Self {
        let mut groups = self.groups.clone();
        for (case_id, events) in &other.groups {
            groups
                .entry(case_id.clone())
                .or_default()
                .extend(events.iter().cloned());
        }
        Self { groups }
    }
}

/// Group an unordered event stream into one instance per case
///
/// An empty stream yields an empty mapping.
pub fn group_by_case<I>(events: I) -> BTreeMap<CaseId, ProcessInstance>
where
    I: IntoIterator<Item = Event>,
{
    CaseGroups::from_events(events).into_instances()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeUnit;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0).unwrap()
    }

    fn event(case: &str, activity: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Event {
        Event::new(case, activity, "Alice", start, end).unwrap()
    }

    fn sample() -> Vec<Event> {
        vec![
            event("2", "submit", at(2, 10, 0), at(2, 10, 2)),
            event("1", "approve", at(1, 9, 20), at(1, 9, 25)),
            event("1", "submit", at(1, 9, 0), at(1, 9, 5)),
            event("1", "review", at(1, 9, 5), at(1, 9, 20)),
        ]
    }

    #[test]
    fn test_group_by_case() {
        let instances = group_by_case(sample());
        assert_eq!(instances.len(), 2);

        let first = &instances[&CaseId::from("1")];
        assert_eq!(first.size(), 3);
        assert_eq!(first.duration(TimeUnit::Minute), 25.0);
        let order: Vec<_> = first.events().iter().map(|e| e.activity().as_str()).collect();
        assert_eq!(order, vec!["submit", "review", "approve"]);

        let second = &instances[&CaseId::from("2")];
        assert_eq!(second.size(), 1);
        assert_eq!(second.duration(TimeUnit::Minute), 2.0);
    }

    #[test]
    fn test_empty_stream_groups_to_nothing() {
        assert!(group_by_case(Vec::new()).is_empty());
        assert!(CaseGroups::identity().into_instances().is_empty());
    }

    #[test]
    fn test_partitioned_grouping_matches_whole() {
        let events = sample();
        let whole = group_by_case(events.clone());

        let left = CaseGroups::from_slice(0, &events[..2]);
        let right = CaseGroups::from_slice(2, &events[2..]);

        assert_eq!(left.combine(&right).into_instances(), whole);
        assert_eq!(right.combine(&left).into_instances(), whole);
    }

    #[test]
    fn test_tie_break_uses_arrival_index_across_partitions() {
        let first = event("7", "first", at(3, 8, 0), at(3, 8, 1));
        let second = event("7", "second", at(3, 8, 0), at(3, 8, 2));

        let early = CaseGroups::from_slice(0, std::slice::from_ref(&first));
        let late = CaseGroups::from_slice(1, std::slice::from_ref(&second));

        // merge order must not matter
        let instances = late.combine(&early).into_instances();
        let order: Vec<_> = instances[&CaseId::from("7")]
            .events()
            .iter()
            .map(|e| e.activity().as_str())
            .collect();
        assert_eq!(order, vec!["first", "second"]);
    }

    #[test]
    fn test_counts() {
        let groups = CaseGroups::from_events(sample());
        assert_eq!(groups.case_count(), 2);
        assert_eq!(groups.event_count(), 4);
    }
}
