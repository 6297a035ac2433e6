//! Common test fixtures

#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use procminer::Event;
use proptest::prelude::*;

pub const ACTIVITIES: [&str; 4] = ["submit", "review", "approve", "reject"];
pub const ORIGINATORS: [&str; 3] = ["Alice", "Bob", "Carol"];

pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0).unwrap()
}

/// Two cases: a three-step claim handled by Alice and Bob, and a lone submit
pub fn scenario_events() -> Vec<Event> {
    vec![
        Event::new("1", "submit", "Alice", at(1, 9, 0), at(1, 9, 5)).unwrap(),
        Event::new("1", "review", "Bob", at(1, 9, 5), at(1, 9, 20)).unwrap(),
        Event::new("1", "approve", "Alice", at(1, 9, 20), at(1, 9, 25)).unwrap(),
        Event::new("2", "submit", "Bob", at(2, 10, 0), at(2, 10, 2)).unwrap(),
    ]
}

/// The scenario as JSON Lines, with the second case listed first
pub const SCENARIO_JSONL: &str = r#"{"case_id":"2","activity":"submit","originator":"Bob","start":"2024-01-02T10:00:00Z","end":"2024-01-02T10:02:00Z"}
{"case_id":"1","activity":"submit","originator":"Alice","start":"2024-01-01T09:00:00Z","end":"2024-01-01T09:05:00Z"}
{"case_id":"1","activity":"review","originator":"Bob","start":"2024-01-01T09:05:00Z","end":"2024-01-01T09:20:00Z"}
{"case_id":"1","activity":"approve","originator":"Alice","start":"2024-01-01T09:20:00Z","end":"2024-01-01T09:25:00Z"}
"#;

/// Events over a handful of cases, whole-minute timestamps spread over two weeks
pub fn event_strategy() -> impl Strategy<Value = Event> {
    (
        0..6u8,
        0..ACTIVITIES.len(),
        0..ORIGINATORS.len(),
        0i64..20_000,
        0i64..240,
    )
        .prop_map(|(case, activity, originator, offset, length)| {
            let start = at(1, 0, 0) + TimeDelta::minutes(offset);
            Event::new(
                format!("case-{}", case),
                ACTIVITIES[activity],
                ORIGINATORS[originator],
                start,
                start + TimeDelta::minutes(length),
            )
            .unwrap()
        })
}

pub fn events_strategy(max_len: usize) -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec(event_strategy(), 0..max_len)
}
