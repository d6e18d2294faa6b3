//! Debounced autosave state machine for the notes editor.
//!
//! # Responsibility
//! - Hold the selected note, its last-persisted snapshot and the draft.
//! - Coalesce bursts of edits into one save request per debounce window.
//! - Track the single in-flight save and discard stale completions.
//!
//! # Invariants
//! - At most one timer is armed; re-arming bumps the generation so an older
//!   handle can never fire.
//! - At most one save is in flight; a completion whose ticket is not the
//!   current one is discarded without touching state.
//! - A save request is only emitted when the draft differs from the
//!   snapshot.
//! - Failures never modify the draft.
//!
//! The controller never sleeps and never talks to storage. Hosts call
//! `poll(now_ms)` from their event loop, execute the returned request and
//! report back through `complete_save`.

use crate::model::note::{Note, NoteDraft, NoteField, NoteId, NotePatch, DEFAULT_NOTE_CATEGORY};
use log::{debug, info, warn};
use std::fmt::Display;

/// Externally visible persistence indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// Draft equals the persisted snapshot, or nothing is selected.
    Saved,
    /// Edits are pending or a save is in flight.
    Saving,
    /// The last save attempt failed; the draft is kept as typed.
    Failed,
}

/// Internal state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosavePhase {
    Idle,
    DirtyPending,
    Saving,
}

/// Armed debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    generation: u64,
    deadline_ms: i64,
}

impl TimerHandle {
    pub fn deadline_ms(&self) -> i64 {
        self.deadline_ms
    }
}

/// Identifies one in-flight save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTicket {
    note_id: NoteId,
    sequence: u64,
}

impl SaveTicket {
    pub fn note_id(&self) -> NoteId {
        self.note_id
    }
}

/// One persistence call the host must execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub ticket: SaveTicket,
    pub note_id: NoteId,
    pub patch: NotePatch,
}

/// Result of applying one edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// No note is selected.
    Ignored,
    /// Value equals the current draft value.
    Unchanged,
    /// Draft matches the snapshot again; any timer was cancelled.
    Reverted,
    /// Timer (re-)armed.
    Scheduled { deadline_ms: i64 },
    /// A save is in flight; a fresh debounce starts once it resolves.
    Deferred,
}

/// Result of reporting a save completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Snapshot advanced to the saved values.
    Persisted,
    /// Save failed; draft kept, status `Failed`.
    Failed,
    /// Ticket was stale (note switched, deselected or deleted).
    Discarded,
}

#[derive(Debug, Clone)]
struct InFlight {
    ticket: SaveTicket,
    sent: NotePatch,
}

/// Debounced autosave controller for one editor instance.
#[derive(Debug)]
pub struct AutosaveController {
    debounce_ms: i64,
    /// Category of the empty draft shown without a selection.
    default_category: String,
    selected: Option<Note>,
    draft: NoteDraft,
    timer: Option<TimerHandle>,
    in_flight: Option<InFlight>,
    status: SaveStatus,
    next_generation: u64,
    next_sequence: u64,
}

impl AutosaveController {
    /// Creates a controller with the given debounce window.
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            debounce_ms: i64::try_from(debounce_ms).unwrap_or(i64::MAX),
            default_category: DEFAULT_NOTE_CATEGORY.to_string(),
            selected: None,
            draft: NoteDraft::empty(),
            timer: None,
            in_flight: None,
            status: SaveStatus::Saved,
            next_generation: 0,
            next_sequence: 0,
        }
    }

    /// Uses `category` for the empty draft instead of the built-in default.
    pub fn with_default_category(mut self, category: impl Into<String>) -> Self {
        self.default_category = category.into();
        if self.selected.is_none() {
            self.draft = self.empty_draft();
        }
        self
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    /// Boolean indicator shown next to the editor.
    pub fn is_saving(&self) -> bool {
        self.status == SaveStatus::Saving
    }

    pub fn phase(&self) -> AutosavePhase {
        if self.in_flight.is_some() {
            AutosavePhase::Saving
        } else if self.timer.is_some() {
            AutosavePhase::DirtyPending
        } else {
            AutosavePhase::Idle
        }
    }

    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    /// Selected note with its last-persisted field values.
    pub fn selected(&self) -> Option<&Note> {
        self.selected.as_ref()
    }

    pub fn selected_id(&self) -> Option<NoteId> {
        self.selected.as_ref().map(|note| note.id)
    }

    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    /// Whether the draft differs from the last-persisted snapshot.
    pub fn has_unsaved_changes(&self) -> bool {
        self.selected
            .as_ref()
            .is_some_and(|note| !draft_matches(&self.draft, note))
    }

    /// Loads `note` into the draft, dropping any pending or in-flight save.
    ///
    /// Re-selecting the current note keeps the draft and only refreshes
    /// metadata.
    pub fn select(&mut self, note: &Note) {
        if self.selected_id() == Some(note.id) {
            self.sync_metadata(note);
            return;
        }
        self.abandon("select");
        self.draft = note.draft();
        self.selected = Some(note.clone());
        debug!(
            "event=autosave_select module=autosave status=ok note_id={}",
            note.id
        );
    }

    /// Clears the selection and resets the draft to empty.
    pub fn deselect(&mut self) {
        self.abandon("deselect");
        self.selected = None;
        self.draft = self.empty_draft();
    }

    /// Cancels timer and in-flight ticket when they target `id`.
    ///
    /// The draft is left intact so a failed delete can resume saving.
    pub fn cancel_for(&mut self, id: NoteId) -> bool {
        if self.selected_id() != Some(id) {
            return false;
        }
        self.cancel_timer();
        if self.in_flight.take().is_some() {
            debug!("event=autosave_cancel module=autosave status=ok note_id={id} reason=inflight_dropped");
        }
        true
    }

    /// Finishes a delete of `id`: deselects when it was the selected note.
    pub fn note_deleted(&mut self, id: NoteId) -> bool {
        if self.selected_id() != Some(id) {
            return false;
        }
        self.deselect();
        true
    }

    /// Re-arms the debounce when the draft still differs from the snapshot.
    pub fn resume(&mut self, now_ms: i64) -> bool {
        if self.in_flight.is_some() || self.timer.is_some() || !self.has_unsaved_changes() {
            return false;
        }
        self.arm(now_ms);
        self.status = SaveStatus::Saving;
        true
    }

    /// Updates one draft field.
    pub fn edit(&mut self, field: NoteField, value: impl Into<String>, now_ms: i64) -> EditOutcome {
        let Some(snapshot) = self.selected.as_ref() else {
            return EditOutcome::Ignored;
        };

        let value = value.into();
        let slot = match field {
            NoteField::Title => &mut self.draft.title,
            NoteField::Content => &mut self.draft.content,
            NoteField::Category => &mut self.draft.category,
        };
        if *slot == value {
            return EditOutcome::Unchanged;
        }
        *slot = value;

        if self.in_flight.is_some() {
            self.status = SaveStatus::Saving;
            return EditOutcome::Deferred;
        }

        if draft_matches(&self.draft, snapshot) {
            self.cancel_timer();
            self.status = SaveStatus::Saved;
            return EditOutcome::Reverted;
        }

        let deadline_ms = self.arm(now_ms);
        self.status = SaveStatus::Saving;
        debug!(
            "event=autosave_arm module=autosave status=ok field={} deadline_ms={deadline_ms}",
            field.as_str()
        );
        EditOutcome::Scheduled { deadline_ms }
    }

    /// Fires the timer when its deadline has passed.
    pub fn poll(&mut self, now_ms: i64) -> Option<SaveRequest> {
        let timer = self.timer?;
        if now_ms < timer.deadline_ms || self.in_flight.is_some() {
            return None;
        }
        self.timer = None;
        self.begin_save(now_ms)
    }

    /// Fires immediately when the draft differs from the snapshot.
    ///
    /// Used for explicit saves and manual retries after a failure.
    pub fn flush(&mut self, now_ms: i64) -> Option<SaveRequest> {
        if self.in_flight.is_some() {
            return None;
        }
        self.cancel_timer();
        self.begin_save(now_ms)
    }

    /// Reports the outcome of the request identified by `ticket`.
    pub fn complete_save<E: Display>(
        &mut self,
        ticket: SaveTicket,
        result: Result<(), E>,
        now_ms: i64,
    ) -> Completion {
        let current = self
            .in_flight
            .as_ref()
            .is_some_and(|flight| flight.ticket == ticket);
        if !current {
            debug!(
                "event=autosave_complete module=autosave status=discarded note_id={}",
                ticket.note_id
            );
            return Completion::Discarded;
        }
        let Some(flight) = self.in_flight.take() else {
            return Completion::Discarded;
        };

        match result {
            Ok(()) => {
                if let Some(note) = self.selected.as_mut() {
                    flight.sent.apply_to(note);
                }
                info!(
                    "event=autosave_complete module=autosave status=ok note_id={}",
                    ticket.note_id
                );
                if self.has_unsaved_changes() {
                    self.arm(now_ms);
                    self.status = SaveStatus::Saving;
                } else {
                    self.status = SaveStatus::Saved;
                }
                Completion::Persisted
            }
            Err(err) => {
                warn!(
                    "event=autosave_complete module=autosave status=error note_id={} error={}",
                    ticket.note_id, err
                );
                let edited_in_flight = !patch_matches(&flight.sent, &self.draft);
                if edited_in_flight {
                    self.arm(now_ms);
                    self.status = SaveStatus::Saving;
                } else {
                    self.status = SaveStatus::Failed;
                }
                Completion::Failed
            }
        }
    }

    /// Copies store-assigned metadata for the selected note.
    ///
    /// Editable fields are not touched; the snapshot only advances through
    /// `complete_save`.
    pub fn sync_metadata(&mut self, stored: &Note) {
        if let Some(note) = self.selected.as_mut().filter(|note| note.id == stored.id) {
            note.created_at = stored.created_at;
            note.updated_at = note.updated_at.max(stored.updated_at);
        }
    }

    fn begin_save(&mut self, now_ms: i64) -> Option<SaveRequest> {
        let note = self.selected.as_ref()?;
        if draft_matches(&self.draft, note) {
            self.status = SaveStatus::Saved;
            return None;
        }

        self.next_sequence += 1;
        let ticket = SaveTicket {
            note_id: note.id,
            sequence: self.next_sequence,
        };
        let patch = self.draft.to_patch(now_ms);
        self.in_flight = Some(InFlight {
            ticket,
            sent: patch.clone(),
        });
        self.status = SaveStatus::Saving;
        debug!(
            "event=autosave_fire module=autosave status=start note_id={} title_len={} content_len={}",
            note.id,
            self.draft.title.len(),
            self.draft.content.len()
        );

        Some(SaveRequest {
            ticket,
            note_id: note.id,
            patch,
        })
    }

    fn empty_draft(&self) -> NoteDraft {
        NoteDraft::new("", "", self.default_category.as_str())
    }

    fn arm(&mut self, now_ms: i64) -> i64 {
        self.next_generation += 1;
        let deadline_ms = now_ms.saturating_add(self.debounce_ms);
        self.timer = Some(TimerHandle {
            generation: self.next_generation,
            deadline_ms,
        });
        deadline_ms
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            debug!(
                "event=autosave_cancel module=autosave status=ok generation={}",
                timer.generation
            );
        }
    }

    fn abandon(&mut self, reason: &str) {
        self.cancel_timer();
        if let Some(flight) = self.in_flight.take() {
            debug!(
                "event=autosave_abandon module=autosave status=ok note_id={} reason={reason}",
                flight.ticket.note_id
            );
        }
        self.status = SaveStatus::Saved;
    }
}

fn draft_matches(draft: &NoteDraft, note: &Note) -> bool {
    draft.title == note.title && draft.content == note.content && draft.category == note.category
}

fn patch_matches(patch: &NotePatch, draft: &NoteDraft) -> bool {
    patch.title.as_deref() == Some(draft.title.as_str())
        && patch.content.as_deref() == Some(draft.content.as_str())
        && patch.category.as_deref() == Some(draft.category.as_str())
}
