use crate::config::TimeUnit;
use crate::error::{ErrorCode, ProcMinerError, Result};
use chrono::{DateTime, FixedOffset, Offset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

identifier!(
    /// Identifier of one process execution
    CaseId
);
identifier!(
    /// Category of work an event represents, e.g. "submit"
    ActivityClass
);
identifier!(
    /// Actor (person or system) that performed an event
    Originator
);

/// One observed unit of work within a case
///
/// Construction rejects events that end before they start, so every
/// `Event` satisfies `start <= end`. Timestamps are held in UTC; the offset
/// the start was recorded with is kept alongside for local-day bucketing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "EventRecord", into = "EventRecord")]
pub struct Event {
    case_id: CaseId,
    activity: ActivityClass,
    originator: Originator,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    start_offset: FixedOffset,
}

impl Event {
    pub fn new(
        case_id: impl Into<CaseId>,
        activity: impl Into<ActivityClass>,
        originator: impl Into<Originator>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self> {
        let case_id = case_id.into();
        let activity = activity.into();

        if case_id.as_str().is_empty() {
            return Err(ProcMinerError::validation_with_code(
                ErrorCode::VALIDATION_EMPTY_IDENTIFIER,
                "case id must not be empty",
                Some("case_id".to_string()),
            ));
        }
        if activity.as_str().is_empty() {
            return Err(ProcMinerError::validation_with_code(
                ErrorCode::VALIDATION_EMPTY_IDENTIFIER,
                "activity class must not be empty",
                Some("activity".to_string()),
            )
            .with_case_id(case_id.as_str()));
        }
        if end < start {
            return Err(ProcMinerError::invalid_timestamp_ordering(case_id.as_str()));
        }

        Ok(Self {
            case_id,
            activity,
            originator: originator.into(),
            start,
            end,
            start_offset: Utc.fix(),
        })
    }

    /// Record the offset the start timestamp was observed in
    pub fn with_start_offset(mut self, offset: FixedOffset) -> Self {
        self.start_offset = offset;
        self
    }

    /// An event whose start and end coincide
    pub fn instantaneous(
        case_id: impl Into<CaseId>,
        activity: impl Into<ActivityClass>,
        originator: impl Into<Originator>,
        at: DateTime<Utc>,
    ) -> Result<Self> {
        Self::new(case_id, activity, originator, at, at)
    }

    pub fn case_id(&self) -> &CaseId {
        &self.case_id
    }

    pub fn activity(&self) -> &ActivityClass {
        &self.activity
    }

    pub fn originator(&self) -> &Originator {
        &self.originator
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn start_offset(&self) -> FixedOffset {
        self.start_offset
    }

    /// Start instant in the offset it was recorded with
    pub fn local_start(&self) -> DateTime<FixedOffset> {
        self.start.with_timezone(&self.start_offset)
    }

    pub fn span(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Duration in `unit`; never negative
    pub fn duration(&self, unit: TimeUnit) -> f64 {
        unit.of(self.span())
    }
}

/// Wire form of an [`Event`] as produced by the ingestion layer
///
/// `end` may be omitted for instantaneous events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub case_id: String,
    #[serde(alias = "activity_class")]
    pub activity: String,
    #[serde(default)]
    pub originator: String,
    #[serde(alias = "start_timestamp")]
    pub start: DateTime<FixedOffset>,
    #[serde(default, alias = "end_timestamp", skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<FixedOffset>>,
}

impl TryFrom<EventRecord> for Event {
    type Error = ProcMinerError;

    fn try_from(record: EventRecord) -> Result<Self> {
        let end = record.end.unwrap_or(record.start);
        let event = Event::new(
            record.case_id,
            record.activity,
            record.originator,
            record.start.with_timezone(&Utc),
            end.with_timezone(&Utc),
        )?;
        Ok(event.with_start_offset(*record.start.offset()))
    }
}

impl From<Event> for EventRecord {
    fn from(event: Event) -> Self {
        let offset = event.start_offset;
        EventRecord {
            start: event.start.with_timezone(&offset),
            end: Some(event.end.with_timezone(&offset)),
            case_id: event.case_id.0,
            activity: event.activity.0,
            originator: event.originator.0,
        }
    }
}
