//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the store contracts consumed by services (`NoteRepository`,
//!   `TodoRepository`, `TimetableRepository`).
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Every read is scoped by `user_id`; writes are scoped by record id.
//! - Repository writes validate inputs before SQL mutations.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

mod error;
pub mod note_repo;
mod schema;
pub mod timetable_repo;
pub mod todo_repo;

pub use error::{RepoError, RepoResult};
