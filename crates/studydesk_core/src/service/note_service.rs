//! Notes editor use-case service.
//!
//! # Responsibility
//! - Own the cached note list, the autosave controller and the note store.
//! - Execute save requests emitted by the controller and refresh metadata.
//! - Derive list previews for the notes sidebar.
//!
//! # Invariants
//! - A failed fetch never overwrites the cached list.
//! - A successful save is reflected in the cached list even when the
//!   follow-up fetch fails.
//! - A failed save never modifies the draft.
//! - Deleting a note cancels save activity for it before the store call.
//!
//! # See also
//! - `service::autosave` for the state machine itself.

use crate::config::{ConfigError, EditorConfig};
use crate::model::note::{Note, NoteDraft, NoteField, NoteId};
use crate::model::UserId;
use crate::repo::note_repo::NoteRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::autosave::{
    AutosaveController, Completion, EditOutcome, SaveRequest, SaveStatus,
};
use log::{error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const PREVIEW_MAX_CHARS: usize = 100;

static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\*_`#>~]+").expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Service error for editor use-cases.
#[derive(Debug)]
pub enum NoteEditorError {
    Config(ConfigError),
    /// Target note is not in the cached list.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteEditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid editor config: {err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteEditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NoteNotFound(_) => None,
        }
    }
}

impl From<ConfigError> for NoteEditorError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RepoError> for NoteEditorError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Sidebar row for one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteSummary {
    pub id: NoteId,
    pub title: String,
    /// Plain-text excerpt; `None` renders as "Empty note".
    pub preview: Option<String>,
    pub category: String,
    pub updated_at: i64,
    pub selected: bool,
}

/// Notes editor facade over a note repository.
pub struct NoteEditor<R: NoteRepository> {
    repo: R,
    user_id: UserId,
    config: EditorConfig,
    notes: Vec<Note>,
    autosave: AutosaveController,
}

impl<R: NoteRepository> NoteEditor<R> {
    /// Creates an editor for `user_id`; the note list starts empty until
    /// `refresh` is called.
    pub fn new(repo: R, user_id: UserId, config: EditorConfig) -> Result<Self, NoteEditorError> {
        config.validate()?;
        Ok(Self {
            repo,
            user_id,
            autosave: AutosaveController::new(config.debounce_ms)
                .with_default_category(config.default_category.clone()),
            config,
            notes: Vec::new(),
        })
    }

    /// Reloads the note list from the store.
    ///
    /// On failure the previous list is kept and the error is returned.
    pub fn refresh(&mut self) -> Result<&[Note], NoteEditorError> {
        let notes = self.repo.fetch_notes(self.user_id).map_err(|err| {
            warn!(
                "event=notes_fetch module=service status=error user_id={} error={}",
                self.user_id, err
            );
            err
        })?;

        if let Some(stored) = self
            .autosave
            .selected_id()
            .and_then(|id| notes.iter().find(|note| note.id == id))
        {
            self.autosave.sync_metadata(stored);
        }
        self.notes = notes;
        Ok(&self.notes)
    }

    /// Cached notes, most recently modified first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Sidebar rows derived from the cached list.
    pub fn summaries(&self) -> Vec<NoteSummary> {
        let selected = self.autosave.selected_id();
        self.notes
            .iter()
            .map(|note| NoteSummary {
                id: note.id,
                title: note.title.clone(),
                preview: derive_preview_text(&note.content),
                category: note.category.clone(),
                updated_at: note.updated_at,
                selected: selected == Some(note.id),
            })
            .collect()
    }

    /// Creates a placeholder note and selects it.
    pub fn create_note(&mut self) -> Result<NoteId, NoteEditorError> {
        let created = self.repo.create_note(
            self.user_id,
            &self.config.placeholder_title,
            "",
            &self.config.default_category,
        )?;
        info!(
            "event=note_create module=service status=ok note_id={}",
            created.id
        );

        if self.refresh().is_err() {
            self.notes.insert(0, created.clone());
        }
        self.autosave.select(&created);
        Ok(created.id)
    }

    /// Selects a note from the cached list.
    pub fn select_note(&mut self, id: NoteId) -> Result<(), NoteEditorError> {
        let note = self
            .notes
            .iter()
            .find(|note| note.id == id)
            .ok_or(NoteEditorError::NoteNotFound(id))?;
        self.autosave.select(note);
        Ok(())
    }

    /// Clears the selection, cancelling any pending save.
    pub fn deselect(&mut self) {
        self.autosave.deselect();
    }

    pub fn edit_title(&mut self, value: impl Into<String>, now_ms: i64) -> EditOutcome {
        self.autosave.edit(NoteField::Title, value, now_ms)
    }

    pub fn edit_content(&mut self, value: impl Into<String>, now_ms: i64) -> EditOutcome {
        self.autosave.edit(NoteField::Content, value, now_ms)
    }

    pub fn edit_category(&mut self, value: impl Into<String>, now_ms: i64) -> EditOutcome {
        self.autosave.edit(NoteField::Category, value, now_ms)
    }

    /// Drives the debounce timer; persists the draft when it fires.
    pub fn tick(&mut self, now_ms: i64) -> Option<Completion> {
        let request = self.autosave.poll(now_ms)?;
        Some(self.execute(request, now_ms))
    }

    /// Persists the draft immediately when it has unsaved changes.
    pub fn save_now(&mut self, now_ms: i64) -> Option<Completion> {
        let request = self.autosave.flush(now_ms)?;
        Some(self.execute(request, now_ms))
    }

    /// Deletes a note, cancelling save activity for it first.
    ///
    /// When the store rejects the delete the draft is kept and autosave
    /// resumes.
    pub fn delete_note(&mut self, id: NoteId, now_ms: i64) -> Result<(), NoteEditorError> {
        let was_selected = self.autosave.cancel_for(id);

        if let Err(err) = self.repo.delete_note(id) {
            error!(
                "event=note_delete module=service status=error note_id={id} error={err}"
            );
            if was_selected {
                self.autosave.resume(now_ms);
            }
            return Err(err.into());
        }

        self.autosave.note_deleted(id);
        self.notes.retain(|note| note.id != id);
        info!("event=note_delete module=service status=ok note_id={id}");

        if let Err(err) = self.refresh() {
            warn!("event=note_delete module=service status=stale_list error={err}");
        }
        Ok(())
    }

    pub fn draft(&self) -> &NoteDraft {
        self.autosave.draft()
    }

    pub fn selected_id(&self) -> Option<NoteId> {
        self.autosave.selected_id()
    }

    pub fn status(&self) -> SaveStatus {
        self.autosave.status()
    }

    pub fn is_saving(&self) -> bool {
        self.autosave.is_saving()
    }

    pub fn autosave(&self) -> &AutosaveController {
        &self.autosave
    }

    /// Store handle, mainly for tests and diagnostics.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    fn execute(&mut self, request: SaveRequest, now_ms: i64) -> Completion {
        let started_at = Instant::now();
        let result: RepoResult<()> = self.repo.update_note(request.note_id, &request.patch);
        let saved = result.is_ok();
        let completion = self.autosave.complete_save(request.ticket, result, now_ms);

        if saved {
            info!(
                "event=note_save module=service status=ok note_id={} duration_ms={}",
                request.note_id,
                started_at.elapsed().as_millis()
            );
            if let Some(cached) = self
                .notes
                .iter_mut()
                .find(|note| note.id == request.note_id)
            {
                request.patch.apply_to(cached);
            }
            if let Err(err) = self.refresh() {
                warn!("event=note_save module=service status=stale_list error={err}");
            }
        }
        completion
    }
}

/// Derives a plain-text excerpt for list rows.
///
/// Markdown link syntax keeps its label, emphasis/heading symbols are
/// removed, whitespace is collapsed, and the result is capped at 100 chars.
pub fn derive_preview_text(content: &str) -> Option<String> {
    let without_links = MARKDOWN_LINK_RE.replace_all(content, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::derive_preview_text;

    #[test]
    fn preview_is_none_for_blank_content() {
        assert_eq!(derive_preview_text(""), None);
        assert_eq!(derive_preview_text("  \n# "), None);
    }

    #[test]
    fn preview_keeps_link_labels_and_limits_length() {
        let preview = derive_preview_text("# Week 3\n**Read** [chapter 2](https://example.com)")
            .expect("preview should exist");
        assert_eq!(preview, "Week 3 Read chapter 2");

        let long = "a".repeat(300);
        assert_eq!(derive_preview_text(&long).unwrap().len(), 100);
    }
}
