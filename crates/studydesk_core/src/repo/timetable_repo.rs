//! Timetable repository contract and SQLite implementation.
//!
//! # Invariants
//! - `fetch_entries` is sorted by `start_time ASC, id ASC` across all days.
//! - `create_entry` validates input before inserting.

use crate::model::timetable::{NewTimetableEntry, TimetableEntry, TimetableEntryId, Weekday};
use crate::model::UserId;
use crate::repo::schema::{ensure_table, parse_uuid};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    day,
    subject,
    start_time,
    end_time,
    location,
    color,
    created_at
FROM timetable";

/// Store contract for timetable entries.
pub trait TimetableRepository {
    fn fetch_entries(&self, user_id: UserId) -> RepoResult<Vec<TimetableEntry>>;
    fn create_entry(
        &self,
        user_id: UserId,
        input: &NewTimetableEntry,
        now_ms: i64,
    ) -> RepoResult<TimetableEntry>;
    fn delete_entry(&self, id: TimetableEntryId) -> RepoResult<()>;
}

/// SQLite-backed timetable repository.
pub struct SqliteTimetableRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTimetableRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(
            conn,
            "timetable",
            &[
                "id",
                "user_id",
                "day",
                "subject",
                "start_time",
                "end_time",
                "location",
                "color",
                "created_at",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl TimetableRepository for SqliteTimetableRepository<'_> {
    fn fetch_entries(&self, user_id: UserId) -> RepoResult<Vec<TimetableEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY start_time ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }

    fn create_entry(
        &self,
        user_id: UserId,
        input: &NewTimetableEntry,
        now_ms: i64,
    ) -> RepoResult<TimetableEntry> {
        input.validate()?;

        let entry = TimetableEntry {
            id: Uuid::new_v4(),
            user_id,
            day: input.day,
            subject: input.subject.clone(),
            start_time: input.start_time.clone(),
            end_time: input.end_time.clone(),
            location: input.location.clone(),
            color: input.color.clone(),
            created_at: now_ms,
        };

        self.conn.execute(
            "INSERT INTO timetable (
                id,
                user_id,
                day,
                subject,
                start_time,
                end_time,
                location,
                color,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                entry.id.to_string(),
                entry.user_id.to_string(),
                entry.day.as_str(),
                entry.subject.as_str(),
                entry.start_time.as_str(),
                entry.end_time.as_str(),
                entry.location.as_str(),
                entry.color.as_str(),
                entry.created_at,
            ],
        )?;

        Ok(entry)
    }

    fn delete_entry(&self, id: TimetableEntryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM timetable WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<TimetableEntry> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let day_text: String = row.get("day")?;
    let day = day_text.parse::<Weekday>().map_err(|_| {
        RepoError::InvalidData(format!("invalid weekday `{day_text}` in timetable.day"))
    })?;

    Ok(TimetableEntry {
        id: parse_uuid(&id_text, "timetable.id")?,
        user_id: parse_uuid(&user_text, "timetable.user_id")?,
        day,
        subject: row.get("subject")?,
        start_time: row.get("start_time")?,
        end_time: row.get("end_time")?,
        location: row.get("location")?,
        color: row.get("color")?,
        created_at: row.get("created_at")?,
    })
}
