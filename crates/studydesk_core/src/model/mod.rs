//! Domain model for the notes/tasks/timetable projections.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own field-level validation rules shared by repositories and services.
//!
//! # Invariants
//! - Every domain record is identified by a stable UUID v4.
//! - Every record is owned by exactly one `UserId`.
//! - Timestamps are Unix epoch milliseconds.

pub mod note;
pub mod timetable;
pub mod todo;
pub mod validation;

use uuid::Uuid;

/// Opaque identifier of the authenticated owner of a record.
///
/// Authentication lives outside core; the id is only used for scoping.
pub type UserId = Uuid;
