use super::event::{ActivityClass, CaseId, Event, Originator};
use crate::config::TimeUnit;
use crate::error::{ErrorCode, ProcMinerError, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Closed interval of instants covered by a log or a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFrame {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeFrame {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Smallest frame covering both
    pub fn union(&self, other: &TimeFrame) -> TimeFrame {
        TimeFrame {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn duration(&self, unit: TimeUnit) -> f64 {
        unit.of(self.end - self.start)
    }
}

/// All events of one case, ordered by start timestamp
///
/// Events with equal start timestamps keep the order in which they were
/// handed to the constructor. An instance always holds at least one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessInstance {
    case_id: CaseId,
    events: Vec<Event>,
    frame: TimeFrame,
}

impl ProcessInstance {
    /// Build an instance from events given in arrival order
    pub fn new(case_id: impl Into<CaseId>, mut events: Vec<Event>) -> Result<Self> {
        let case_id = case_id.into();
        if let Some(stray) = events.iter().find(|e| e.case_id() != &case_id) {
            return Err(ProcMinerError::validation_with_code(
                ErrorCode::VALIDATION_GENERIC,
                format!(
                    "event of case '{}' cannot join instance '{}'",
                    stray.case_id(),
                    case_id
                ),
                Some("case_id".to_string()),
            )
            .with_case_id(case_id.as_str()));
        }
        events.sort_by_key(|e| e.start());
        Self::from_ordered(case_id.clone(), events).ok_or_else(|| {
            ProcMinerError::validation(format!("process instance '{}' has no events", case_id))
                .with_case_id(case_id.as_str())
        })
    }

    /// `events` must already be in start order and share `case_id`; `None` if empty
    pub(crate) fn from_ordered(case_id: CaseId, events: Vec<Event>) -> Option<Self> {
        let frame = events
            .iter()
            .map(|e| TimeFrame::new(e.start(), e.end()))
            .reduce(|a, b| a.union(&b))?;

        Some(Self {
            case_id,
            events,
            frame,
        })
    }

    pub fn case_id(&self) -> &CaseId {
        &self.case_id
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Earliest event start
    pub fn start(&self) -> DateTime<Utc> {
        self.frame.start
    }

    /// Latest event end, which need not belong to the last-starting event
    pub fn end(&self) -> DateTime<Utc> {
        self.frame.end
    }

    pub fn time_frame(&self) -> TimeFrame {
        self.frame
    }

    pub fn span(&self) -> TimeDelta {
        self.frame.end - self.frame.start
    }

    pub fn duration(&self, unit: TimeUnit) -> f64 {
        unit.of(self.span())
    }

    pub fn size(&self) -> usize {
        self.events.len()
    }

    pub fn first_event(&self) -> &Event {
        &self.events[0]
    }

    pub fn last_event(&self) -> &Event {
        &self.events[self.events.len() - 1]
    }

    pub fn first_activity(&self) -> &ActivityClass {
        self.first_event().activity()
    }

    pub fn last_activity(&self) -> &ActivityClass {
        self.last_event().activity()
    }

    /// Originators in event order, repeats included
    pub fn originators(&self) -> impl Iterator<Item = &Originator> {
        self.events.iter().map(|e| e.originator())
    }
}
