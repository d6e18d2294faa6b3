//! Core domain logic for the studydesk dashboard.
//! This crate is the single source of truth for notes, tasks, timetable
//! and the debounced notes autosave.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::now_epoch_ms;
pub use config::{ConfigError, EditorConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteDraft, NoteField, NoteId, NotePatch};
pub use model::timetable::{NewTimetableEntry, TimetableEntry, Weekday};
pub use model::todo::{NewTodo, Priority, Todo};
pub use model::validation::ValidationError;
pub use model::UserId;
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::timetable_repo::{SqliteTimetableRepository, TimetableRepository};
pub use repo::todo_repo::{SqliteTodoRepository, TodoRepository};
pub use repo::{RepoError, RepoResult};
pub use service::analytics_service::{AnalyticsService, DashboardOverview, TaskAnalytics};
pub use service::autosave::{
    AutosaveController, AutosavePhase, Completion, EditOutcome, SaveRequest, SaveStatus,
};
pub use service::note_service::{NoteEditor, NoteEditorError, NoteSummary};
pub use service::timetable_service::{TimetableService, TimetableServiceError};
pub use service::todo_service::{TodoService, TodoServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
