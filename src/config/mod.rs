//! Analysis configuration
//!
//! The only knobs the aggregation engine has are the unit durations are
//! expressed in, the zone events are bucketed into calendar days with, and
//! how many partitions the parallel path splits the event stream into.

use crate::error::{ErrorCode, ProcMinerError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod loader;

pub use loader::ConfigLoader;

/// Unit in which event and case durations are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum TimeUnit {
    Millisecond,
    Second,
    #[default]
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    fn seconds_per_unit(self) -> f64 {
        match self {
            TimeUnit::Millisecond => 0.001,
            TimeUnit::Second => 1.0,
            TimeUnit::Minute => 60.0,
            TimeUnit::Hour => 3_600.0,
            TimeUnit::Day => 86_400.0,
        }
    }

    /// Express a duration as a (fractional) number of this unit
    pub fn of(self, delta: TimeDelta) -> f64 {
        let seconds = delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1e9;
        seconds / self.seconds_per_unit()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Millisecond => "millisecond",
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = ProcMinerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ms" | "millisecond" | "milliseconds" => Ok(TimeUnit::Millisecond),
            "s" | "sec" | "second" | "seconds" => Ok(TimeUnit::Second),
            "m" | "min" | "minute" | "minutes" => Ok(TimeUnit::Minute),
            "h" | "hour" | "hours" => Ok(TimeUnit::Hour),
            "d" | "day" | "days" => Ok(TimeUnit::Day),
            other => Err(ProcMinerError::config_with_code(
                ErrorCode::CONFIG_UNKNOWN_TIME_UNIT,
                format!("unknown time unit '{}'", other),
            )),
        }
    }
}

impl TryFrom<String> for TimeUnit {
    type Error = ProcMinerError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeUnit> for String {
    fn from(unit: TimeUnit) -> Self {
        unit.as_str().to_string()
    }
}

/// Zone in which an event's start instant is truncated to a calendar day
///
/// `Input` uses the offset each event was recorded with, which is UTC for
/// events that carry none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DayBucketZone {
    #[default]
    Input,
    Utc,
    Fixed(FixedOffset),
}

impl DayBucketZone {
    /// Calendar day the instant falls on in this zone
    pub fn day_of(&self, instant: DateTime<FixedOffset>) -> NaiveDate {
        match self {
            DayBucketZone::Input => instant.date_naive(),
            DayBucketZone::Utc => instant.naive_utc().date(),
            DayBucketZone::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }
}

impl fmt::Display for DayBucketZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayBucketZone::Input => f.write_str("input"),
            DayBucketZone::Utc => f.write_str("utc"),
            DayBucketZone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

impl FromStr for DayBucketZone {
    type Err = ProcMinerError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("input") {
            return Ok(DayBucketZone::Input);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
            return Ok(DayBucketZone::Utc);
        }

        let invalid = || {
            ProcMinerError::config_with_code(
                ErrorCode::CONFIG_INVALID_OFFSET,
                format!(
                    "invalid day-bucket zone '{}', expected 'input', 'utc' or '+HH:MM'",
                    s
                ),
            )
        };

        let (sign, rest) = match trimmed.split_at_checked(1) {
            Some(("+", rest)) => (1, rest),
            Some(("-", rest)) => (-1, rest),
            _ => return Err(invalid()),
        };
        let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
        let all_digits =
            |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(hours) || !all_digits(minutes) {
            return Err(invalid());
        }
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if !(0..60).contains(&minutes) {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3_600 + minutes * 60))
            .map(DayBucketZone::Fixed)
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for DayBucketZone {
    type Error = ProcMinerError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DayBucketZone> for String {
    fn from(zone: DayBucketZone) -> Self {
        zone.to_string()
    }
}

fn default_partitions() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Keys of a configuration file as written
///
/// Enumerated values stay strings here and go through their `FromStr`
/// impls afterwards, so a bad value reports its own error code.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    time_unit: Option<String>,
    day_bucket: Option<String>,
    partitions: Option<i64>,
    log_name: Option<String>,
    log_description: Option<String>,
}

/// Caller-supplied parameters for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub time_unit: TimeUnit,
    pub day_bucket: DayBucketZone,
    /// Number of partitions for the parallel path; 1 folds sequentially
    pub partitions: usize,
    pub log_name: Option<String>,
    pub log_description: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            time_unit: TimeUnit::default(),
            day_bucket: DayBucketZone::default(),
            partitions: default_partitions(),
            log_name: None,
            log_description: None,
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequential() -> Self {
        Self {
            partitions: 1,
            ..Self::default()
        }
    }

    pub fn with_time_unit(mut self, unit: TimeUnit) -> Self {
        self.time_unit = unit;
        self
    }

    pub fn with_day_bucket(mut self, zone: DayBucketZone) -> Self {
        self.day_bucket = zone;
        self
    }

    pub fn with_partitions(mut self, partitions: usize) -> Self {
        self.partitions = partitions;
        self
    }

    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(unit) = file.time_unit {
            config.time_unit = unit
                .parse()
                .map_err(|e: ProcMinerError| e.with_context("key 'time_unit'"))?;
        }
        if let Some(zone) = file.day_bucket {
            config.day_bucket = zone
                .parse()
                .map_err(|e: ProcMinerError| e.with_context("key 'day_bucket'"))?;
        }
        if let Some(partitions) = file.partitions {
            config.partitions = usize::try_from(partitions).map_err(|e| {
                ProcMinerError::config_with_code(
                    ErrorCode::CONFIG_INVALID_PARTITIONS,
                    format!("partitions = {} is not a partition count", partitions),
                )
                .with_source(e)
            })?;
        }
        config.log_name = file.log_name;
        config.log_description = file.log_description;

        config.validate()?;
        Ok(config)
    }

    pub fn merge_env_vars(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `PROCMINER_*` overrides resolved through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(unit) = lookup("PROCMINER_TIME_UNIT") {
            self.time_unit = unit.parse()?;
        }

        if let Some(zone) = lookup("PROCMINER_DAY_BUCKET") {
            self.day_bucket = zone.parse()?;
        }

        if let Some(partitions) = lookup("PROCMINER_PARTITIONS") {
            self.partitions = partitions.trim().parse().map_err(|e| {
                ProcMinerError::config_with_code(
                    ErrorCode::CONFIG_INVALID_PARTITIONS,
                    format!("PROCMINER_PARTITIONS='{}' is not a number", partitions),
                )
                .with_source(e)
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.partitions == 0 {
            return Err(ProcMinerError::config_with_code(
                ErrorCode::CONFIG_INVALID_PARTITIONS,
                "partitions must be at least 1",
            ));
        }
        Ok(())
    }
}
