//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted `Note` record and its editable `NoteDraft` triple.
//! - Define the partial update payload sent to the note store.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `updated_at >= created_at` for records read back from storage.
//! - A draft compares equal to a note only when all three editable fields
//!   match exactly (no trimming, no case folding).

use crate::model::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a note.
pub type NoteId = Uuid;

/// Built-in category for new notes and the empty draft.
pub const DEFAULT_NOTE_CATEGORY: &str = "General";
/// Title assigned to notes created from the "new note" action.
pub const PLACEHOLDER_NOTE_TITLE: &str = "New Note";

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub category: String,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    /// Last modification time in epoch milliseconds.
    pub updated_at: i64,
}

impl Note {
    /// Returns the editable fields of this note as a draft.
    pub fn draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            category: self.category.clone(),
        }
    }
}

/// In-memory, possibly unpersisted values of a note's editable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl NoteDraft {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: category.into(),
        }
    }

    /// Draft shown when no note is selected.
    pub fn empty() -> Self {
        Self::new("", "", DEFAULT_NOTE_CATEGORY)
    }

    /// Converts this draft into a full-replacement update payload.
    pub fn to_patch(&self, updated_at: i64) -> NotePatch {
        NotePatch {
            title: Some(self.title.clone()),
            content: Some(self.content.clone()),
            category: Some(self.category.clone()),
            updated_at,
        }
    }
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self::empty()
    }
}

/// One editable field of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Title,
    Content,
    Category,
}

impl NoteField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
            Self::Category => "category",
        }
    }
}

/// Partial update payload for `update_note`.
///
/// `None` fields are left untouched by the store; `updated_at` is always
/// written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub updated_at: i64,
}

impl NotePatch {
    /// Applies this patch onto an in-memory note copy.
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(title) = self.title.as_ref() {
            note.title = title.clone();
        }
        if let Some(content) = self.content.as_ref() {
            note.content = content.clone();
        }
        if let Some(category) = self.category.as_ref() {
            note.category = category.clone();
        }
        note.updated_at = self.updated_at;
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteDraft, NoteField, NotePatch, DEFAULT_NOTE_CATEGORY};
    use uuid::Uuid;

    fn sample_note() -> Note {
        Note {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Lecture".to_string(),
            content: "week 3".to_string(),
            category: "Study".to_string(),
            created_at: 10,
            updated_at: 10,
        }
    }

    #[test]
    fn empty_draft_uses_default_category() {
        let draft = NoteDraft::empty();
        assert_eq!(draft.title, "");
        assert_eq!(draft.content, "");
        assert_eq!(draft.category, DEFAULT_NOTE_CATEGORY);
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut note = sample_note();
        let patch = NotePatch {
            content: Some("week 4".to_string()),
            updated_at: 99,
            ..NotePatch::default()
        };
        patch.apply_to(&mut note);
        assert_eq!(note.title, "Lecture");
        assert_eq!(note.content, "week 4");
        assert_eq!(note.updated_at, 99);
    }

    #[test]
    fn draft_equality_is_exact() {
        let note = sample_note();
        let mut draft = note.draft();
        assert_eq!(draft, note.draft());
        draft.title.push(' ');
        assert_ne!(draft, note.draft());
    }

    #[test]
    fn field_names_match_column_names() {
        assert_eq!(NoteField::Title.as_str(), "title");
        assert_eq!(NoteField::Content.as_str(), "content");
        assert_eq!(NoteField::Category.as_str(), "category");
    }
}
