//! Weekly class timetable model.
//!
//! # Responsibility
//! - Define timetable entries and the weekday enumeration.
//! - Validate clock strings, time ranges and display colors.
//!
//! # Invariants
//! - `start_time`/`end_time` are zero-padded `HH:MM` strings, so
//!   lexicographic order equals chronological order.
//! - `end_time` is strictly after `start_time`.

use crate::model::validation::{require_text, ValidationError};
use crate::model::UserId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a timetable entry.
pub type TimetableEntryId = Uuid;

/// Display colors offered for classes, first entry is the default.
pub const CLASS_COLORS: [&str; 7] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#06B6D4",
];

static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("valid clock regex"));
static COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color regex"));

/// Day of the teaching week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays in display order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Zero-based position in `Weekday::ALL`.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Weekday {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str() == value)
            .ok_or_else(|| ValidationError::InvalidWeekday(value.to_string()))
    }
}

/// Persisted timetable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub id: TimetableEntryId,
    pub user_id: UserId,
    pub day: Weekday,
    pub subject: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub color: String,
    pub created_at: i64,
}

impl TimetableEntry {
    /// Class length in minutes; `0` when stored times are malformed.
    pub fn duration_minutes(&self) -> u32 {
        match (
            clock_minutes(&self.start_time),
            clock_minutes(&self.end_time),
        ) {
            (Some(start), Some(end)) if end > start => end - start,
            _ => 0,
        }
    }
}

/// Input for creating a timetable entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimetableEntry {
    pub day: Weekday,
    pub subject: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub color: String,
}

impl NewTimetableEntry {
    /// Creates an entry input with empty location and the default color.
    pub fn new(
        day: Weekday,
        subject: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            day,
            subject: subject.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            location: String::new(),
            color: CLASS_COLORS[0].to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("subject", &self.subject)?;
        let start = parse_clock("start_time", &self.start_time)?;
        let end = parse_clock("end_time", &self.end_time)?;
        if end <= start {
            return Err(ValidationError::EmptyTimeRange {
                start: self.start_time.clone(),
                end: self.end_time.clone(),
            });
        }
        if !COLOR_RE.is_match(&self.color) {
            return Err(ValidationError::InvalidColor(self.color.clone()));
        }
        Ok(())
    }
}

fn parse_clock(field: &'static str, value: &str) -> Result<u32, ValidationError> {
    clock_minutes(value).ok_or_else(|| ValidationError::InvalidTime {
        field,
        value: value.to_string(),
    })
}

/// Parses `HH:MM` into minutes after midnight.
pub fn clock_minutes(value: &str) -> Option<u32> {
    let caps = CLOCK_RE.captures(value)?;
    let hours: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: u32 = caps.get(2)?.as_str().parse().ok()?;
    Some(hours * 60 + minutes)
}
