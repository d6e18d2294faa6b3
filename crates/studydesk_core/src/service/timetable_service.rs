//! Weekly timetable use-case service.
//!
//! # Invariants
//! - `week` always returns seven days in Monday..Sunday order.
//! - Entries inside a day are sorted by start time.

use crate::model::timetable::{NewTimetableEntry, TimetableEntry, TimetableEntryId, Weekday};
use crate::model::validation::ValidationError;
use crate::model::UserId;
use crate::repo::timetable_repo::TimetableRepository;
use crate::repo::RepoError;
use log::info;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum TimetableServiceError {
    Validation(ValidationError),
    EntryNotFound(TimetableEntryId),
    Repo(RepoError),
}

impl Display for TimetableServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EntryNotFound(id) => write!(f, "timetable entry not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TimetableServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::EntryNotFound(_) => None,
        }
    }
}

impl From<ValidationError> for TimetableServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TimetableServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::EntryNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Entries of one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub day: Weekday,
    pub entries: Vec<TimetableEntry>,
}

/// Groups entries by weekday, Monday first.
///
/// Input order is preserved inside each day, so callers should pass a
/// start-time-sorted list.
pub fn group_by_day(entries: Vec<TimetableEntry>) -> Vec<DaySchedule> {
    let mut week: Vec<DaySchedule> = Weekday::ALL
        .into_iter()
        .map(|day| DaySchedule {
            day,
            entries: Vec::new(),
        })
        .collect();
    for entry in entries {
        week[entry.day.index()].entries.push(entry);
    }
    week
}

/// Timetable service facade over repository implementations.
pub struct TimetableService<R: TimetableRepository> {
    repo: R,
}

impl<R: TimetableRepository> TimetableService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all entries for `user_id`, ascending by start time.
    pub fn list(&self, user_id: UserId) -> Result<Vec<TimetableEntry>, TimetableServiceError> {
        Ok(self.repo.fetch_entries(user_id)?)
    }

    /// Returns the seven-day grid for `user_id`.
    pub fn week(&self, user_id: UserId) -> Result<Vec<DaySchedule>, TimetableServiceError> {
        Ok(group_by_day(self.list(user_id)?))
    }

    /// Adds an entry created at `now_ms`; subject and location are trimmed.
    pub fn add(
        &self,
        user_id: UserId,
        input: NewTimetableEntry,
        now_ms: i64,
    ) -> Result<TimetableEntry, TimetableServiceError> {
        let input = NewTimetableEntry {
            subject: input.subject.trim().to_string(),
            location: input.location.trim().to_string(),
            ..input
        };
        input.validate()?;

        let created = self.repo.create_entry(user_id, &input, now_ms)?;
        info!(
            "event=timetable_create module=service status=ok entry_id={} day={}",
            created.id,
            created.day.as_str()
        );
        Ok(created)
    }

    pub fn delete(&self, id: TimetableEntryId) -> Result<(), TimetableServiceError> {
        self.repo.delete_entry(id)?;
        info!("event=timetable_delete module=service status=ok entry_id={id}");
        Ok(())
    }
}
