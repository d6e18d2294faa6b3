//! Task list use-case service.
//!
//! # Invariants
//! - Listing is always newest-first (`created_at DESC`).
//! - Invalid input is rejected before the store is touched.

use crate::model::todo::{NewTodo, Todo, TodoId};
use crate::model::validation::ValidationError;
use crate::model::UserId;
use crate::repo::todo_repo::TodoRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum TodoServiceError {
    Validation(ValidationError),
    TodoNotFound(TodoId),
    Repo(RepoError),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TodoNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::TodoNotFound(_) => None,
        }
    }
}

impl From<ValidationError> for TodoServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TodoNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Task service facade over repository implementations.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all tasks for `user_id`, newest first.
    pub fn list(&self, user_id: UserId) -> Result<Vec<Todo>, TodoServiceError> {
        Ok(self.repo.fetch_todos(user_id)?)
    }

    /// Adds a task created at `now_ms`; title is trimmed, blank titles are
    /// rejected.
    pub fn add(
        &self,
        user_id: UserId,
        input: NewTodo,
        now_ms: i64,
    ) -> Result<Todo, TodoServiceError> {
        let input = NewTodo {
            title: input.title.trim().to_string(),
            ..input
        };
        input.validate()?;

        let created = self.repo.create_todo(user_id, &input, now_ms)?;
        info!(
            "event=todo_create module=service status=ok todo_id={} priority={}",
            created.id,
            created.priority.as_str()
        );
        Ok(created)
    }

    /// Flips the completion flag of task `id` and returns the new value.
    pub fn toggle_complete(&self, id: TodoId, now_ms: i64) -> Result<bool, TodoServiceError> {
        let completed = self.repo.toggle_todo_completed(id, now_ms)?;
        info!("event=todo_toggle module=service status=ok todo_id={id} completed={completed}");
        Ok(completed)
    }

    pub fn delete(&self, id: TodoId) -> Result<(), TodoServiceError> {
        self.repo.delete_todo(id)?;
        info!("event=todo_delete module=service status=ok todo_id={id}");
        Ok(())
    }
}
