use studydesk_core::{
    AutosaveController, AutosavePhase, Completion, EditOutcome, Note, NoteDraft, NoteField,
    SaveStatus,
};
use uuid::Uuid;

const WINDOW_MS: u64 = 1000;

fn note(title: &str) -> Note {
    Note {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        title: title.to_string(),
        content: String::new(),
        category: "General".to_string(),
        created_at: 0,
        updated_at: 0,
    }
}

fn ok() -> Result<(), String> {
    Ok(())
}

fn backend_down() -> Result<(), String> {
    Err("backend unavailable".to_string())
}

#[test]
fn burst_within_window_fires_once_with_last_values() {
    let mut controller = AutosaveController::new(WINDOW_MS);
    let note_a = note("X");
    controller.select(&note_a);

    controller.edit(NoteField::Content, "XY", 0);
    controller.edit(NoteField::Content, "XYZ", 400);

    assert!(controller.poll(1000).is_none(), "no save at t=1000");
    assert_eq!(controller.phase(), AutosavePhase::DirtyPending);

    let request = controller.poll(1400).expect("save at t=1400");
    assert_eq!(request.note_id, note_a.id);
    assert_eq!(request.patch.content.as_deref(), Some("XYZ"));
    assert_eq!(request.patch.title.as_deref(), Some("X"));
    assert_eq!(request.patch.updated_at, 1400);
    assert_eq!(controller.phase(), AutosavePhase::Saving);

    assert!(controller.poll(5000).is_none(), "exactly one request");
    assert_eq!(
        controller.complete_save(request.ticket, ok(), 1450),
        Completion::Persisted
    );
    assert_eq!(controller.phase(), AutosavePhase::Idle);
    assert_eq!(controller.status(), SaveStatus::Saved);
    assert!(controller.poll(10_000).is_none());
}

#[test]
fn saving_indicator_turns_on_at_first_edit() {
    let mut controller = AutosaveController::new(WINDOW_MS);
    controller.select(&note("X"));
    assert!(!controller.is_saving());

    let outcome = controller.edit(NoteField::Title, "XY", 0);
    assert_eq!(outcome, EditOutcome::Scheduled { deadline_ms: 1000 });
    assert!(controller.is_saving());
}

#[test]
fn switching_note_cancels_pending_save() {
    let mut controller = AutosaveController::new(WINDOW_MS);
    let note_a = note("A");
    let note_b = note("B");
    controller.select(&note_a);
    controller.edit(NoteField::Content, "edited", 0);

    controller.select(&note_b);
    assert!(controller.pending_timer().is_none());
    assert_eq!(controller.draft(), &note_b.draft());
    assert_eq!(controller.phase(), AutosavePhase::Idle);
    assert!(!controller.is_saving());

    for now in [500, 1000, 2000, 10_000] {
        assert!(controller.poll(now).is_none());
    }
}

#[test]
fn unchanged_edits_never_arm_the_timer() {
    let mut controller = AutosaveController::new(WINDOW_MS);
    controller.select(&note("X"));

    assert_eq!(
        controller.edit(NoteField::Title, "X", 0),
        EditOutcome::Unchanged
    );
    assert_eq!(
        controller.edit(NoteField::Category, "General", 0),
        EditOutcome::Unchanged
    );
    assert!(controller.pending_timer().is_none());
    assert!(controller.poll(5000).is_none());
    assert!(controller.flush(5000).is_none());
}

#[test]
fn failed_save_keeps_draft_and_clears_indicator() {
    let mut controller = AutosaveController::new(WINDOW_MS);
    let note_a = note("X");
    controller.select(&note_a);
    controller.edit(NoteField::Content, "typed text", 0);

    let request = controller.poll(1000).unwrap();
    let outcome = controller.complete_save(request.ticket, backend_down(), 1100);

    assert_eq!(outcome, Completion::Failed);
    assert!(!controller.is_saving());
    assert_eq!(controller.status(), SaveStatus::Failed);
    assert_eq!(controller.draft().content, "typed text");
    assert!(controller.has_unsaved_changes());
    assert_eq!(controller.selected().unwrap().content, "");
    assert!(controller.poll(60_000).is_none(), "no automatic retry");
}

#[test]
fn flush_after_failure_retries_manually() {
    let mut controller = AutosaveController::new(WINDOW_MS);
    controller.select(&note("X"));
    controller.edit(NoteField::Content, "typed", 0);
    let first = controller.poll(1000).unwrap();
    controller.complete_save(first.ticket, backend_down(), 1100);

    let retry = controller.flush(2000).expect("manual retry");
    assert_eq!(retry.patch.content.as_deref(), Some("typed"));
    assert_eq!(
        controller.complete_save(retry.ticket, ok(), 2100),
        Completion::Persisted
    );
    assert_eq!(controller.status(), SaveStatus::Saved);
    assert!(!controller.has_unsaved_changes());
}

#[test]
fn edit_during_inflight_save_starts_fresh_debounce_after_it_resolves() {
    let mut controller = AutosaveController::new(WINDOW_MS);
    controller.select(&note("X"));
    controller.edit(NoteField::Content, "first", 0);
    let request = controller.poll(1000).unwrap();

    assert_eq!(
        controller.edit(NoteField::Content, "second", 1050),
        EditOutcome::Deferred
    );
    assert!(controller.poll(3000).is_none(), "one request in flight");

    assert_eq!(
        controller.complete_save(request.ticket, ok(), 1200),
        Completion::Persisted
    );
    assert_eq!(controller.selected().unwrap().content, "first");
    assert_eq!(controller.phase(), AutosavePhase::DirtyPending);
    assert!(controller.is_saving());

    assert!(controller.poll(2100).is_none());
    let follow_up = controller.poll(2200).expect("fresh debounce from completion");
    assert_eq!(follow_up.patch.content.as_deref(), Some("second"));
}

#[test]
fn edit_during_failed_inflight_save_is_scheduled_again() {
    let mut controller = AutosaveController::new(WINDOW_MS);
    controller.select(&note("X"));
    controller.edit(NoteField::Content, "first", 0);
    let request = controller.poll(1000).unwrap();
    controller.edit(NoteField::Content, "second", 1050);

    controller.complete_save(request.ticket, backend_down(), 1200);
    assert_eq!(controller.phase(), AutosavePhase::DirtyPending);
    let next = controller.poll(2200).unwrap();
    assert_eq!(next.patch.content.as_deref(), Some("second"));
}

#[test]
fn deleting_selected_note_clears_draft_and_drops_inflight_result() {
    let mut controller = AutosaveController::new(WINDOW_MS);
    let note_a = note("A");
    controller.select(&note_a);
    controller.edit(NoteField::Content, "body", 0);
    let request = controller.poll(1000).unwrap();

    assert!(controller.cancel_for(note_a.id));
    assert!(controller.note_deleted(note_a.id));

    assert_eq!(controller.draft(), &NoteDraft::empty());
    assert!(controller.selected().is_none());
    assert_eq!(
        controller.complete_save(request.ticket, ok(), 1100),
        Completion::Discarded
    );
    assert!(controller.poll(10_000).is_none());
}

#[test]
fn deleting_selected_note_cancels_pending_timer() {
    let mut controller = AutosaveController::new(WINDOW_MS);
    let note_a = note("A");
    controller.select(&note_a);
    controller.edit(NoteField::Title, "AB", 0);

    controller.cancel_for(note_a.id);
    controller.note_deleted(note_a.id);

    assert!(controller.pending_timer().is_none());
    assert_eq!(controller.draft(), &NoteDraft::empty());
    assert!(controller.poll(5000).is_none());
}

#[test]
fn deleting_other_note_keeps_selection() {
    let mut controller = AutosaveController::new(WINDOW_MS);
    controller.select(&note("A"));
    controller.edit(NoteField::Title, "AB", 0);

    let other = Uuid::new_v4();
    assert!(!controller.cancel_for(other));
    assert!(!controller.note_deleted(other));
    assert!(controller.pending_timer().is_some());
    assert!(controller.poll(1000).is_some());
}

#[test]
fn deselect_cancels_pending_timer() {
    let mut controller = AutosaveController::new(WINDOW_MS);
    controller.select(&note("A"));
    controller.edit(NoteField::Content, "draft", 0);

    controller.deselect();
    assert!(controller.pending_timer().is_none());
    assert!(controller.poll(5000).is_none());
    assert_eq!(
        controller.edit(NoteField::Content, "late", 5000),
        EditOutcome::Ignored
    );
}

#[test]
fn resume_rearms_only_when_draft_is_dirty() {
    let mut controller = AutosaveController::new(WINDOW_MS);
    let note_a = note("A");
    controller.select(&note_a);
    assert!(!controller.resume(0));

    controller.edit(NoteField::Content, "keep me", 0);
    controller.cancel_for(note_a.id);
    assert!(controller.pending_timer().is_none());

    assert!(controller.resume(500));
    let request = controller.poll(1500).unwrap();
    assert_eq!(request.patch.content.as_deref(), Some("keep me"));
}

#[test]
fn reselecting_same_note_keeps_unsaved_draft() {
    let mut controller = AutosaveController::new(WINDOW_MS);
    let note_a = note("A");
    controller.select(&note_a);
    controller.edit(NoteField::Content, "unsaved", 0);

    controller.select(&note_a);
    assert_eq!(controller.draft().content, "unsaved");
    assert!(controller.pending_timer().is_some());
}
