//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI layers decoupled from storage details and from time sources.

pub mod analytics_service;
pub mod autosave;
pub mod note_service;
pub mod timetable_service;
pub mod todo_service;
