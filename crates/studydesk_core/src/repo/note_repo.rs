//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the four note store operations used by the editor.
//! - Assign ids and creation timestamps on insert.
//!
//! # Invariants
//! - `fetch_notes` is sorted by `updated_at DESC, id ASC`.
//! - `update_note` leaves `None` fields untouched and always writes
//!   `updated_at` from the patch.
//! - `delete_note` is a hard delete; deleting a missing id is `NotFound`.

use crate::clock::now_epoch_ms;
use crate::model::note::{Note, NoteId, NotePatch};
use crate::model::UserId;
use crate::repo::schema::{ensure_table, parse_uuid};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    content,
    category,
    created_at,
    updated_at
FROM notes";

/// Store contract for notes.
pub trait NoteRepository {
    /// Lists all notes owned by `user_id`, most recently modified first.
    fn fetch_notes(&self, user_id: UserId) -> RepoResult<Vec<Note>>;
    /// Inserts a note and returns the stored record.
    fn create_note(
        &self,
        user_id: UserId,
        title: &str,
        content: &str,
        category: &str,
    ) -> RepoResult<Note>;
    /// Applies a partial update to one note.
    fn update_note(&self, id: NoteId, patch: &NotePatch) -> RepoResult<()>;
    /// Removes one note.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
}

impl<R: NoteRepository + ?Sized> NoteRepository for &R {
    fn fetch_notes(&self, user_id: UserId) -> RepoResult<Vec<Note>> {
        (**self).fetch_notes(user_id)
    }

    fn create_note(
        &self,
        user_id: UserId,
        title: &str,
        content: &str,
        category: &str,
    ) -> RepoResult<Note> {
        (**self).create_note(user_id, title, content, category)
    }

    fn update_note(&self, id: NoteId, patch: &NotePatch) -> RepoResult<()> {
        (**self).update_note(id, patch)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        (**self).delete_note(id)
    }
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(
            conn,
            "notes",
            &[
                "id",
                "user_id",
                "title",
                "content",
                "category",
                "created_at",
                "updated_at",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn fetch_notes(&self, user_id: UserId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY updated_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn create_note(
        &self,
        user_id: UserId,
        title: &str,
        content: &str,
        category: &str,
    ) -> RepoResult<Note> {
        let now = now_epoch_ms();
        let note = Note {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            content: content.to_string(),
            category: category.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.conn.execute(
            "INSERT INTO notes (
                id,
                user_id,
                title,
                content,
                category,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                note.id.to_string(),
                note.user_id.to_string(),
                note.title.as_str(),
                note.content.as_str(),
                note.category.as_str(),
                note.created_at,
                note.updated_at,
            ],
        )?;

        Ok(note)
    }

    fn update_note(&self, id: NoteId, patch: &NotePatch) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = COALESCE(?2, title),
                content = COALESCE(?3, content),
                category = COALESCE(?4, category),
                updated_at = ?5
             WHERE id = ?1;",
            params![
                id.to_string(),
                patch.title.as_deref(),
                patch.content.as_deref(),
                patch.category.as_deref(),
                patch.updated_at,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    Ok(Note {
        id: parse_uuid(&id_text, "notes.id")?,
        user_id: parse_uuid(&user_text, "notes.user_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        category: row.get("category")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
