//! Task (todo) domain model.
//!
//! # Invariants
//! - `title` is never blank for persisted tasks.
//! - `due_date`, when set, is epoch milliseconds at local midnight chosen
//!   by the caller; core does not interpret time zones.

use crate::model::validation::{require_text, ValidationError};
use crate::model::UserId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a task.
pub type TodoId = Uuid;

/// Task urgency bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Low" => Ok(Self::Low),
            "Medium" => Ok(Self::Medium),
            "High" => Ok(Self::High),
            other => Err(ValidationError::InvalidPriority(other.to_string())),
        }
    }
}

/// Persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
    pub due_date: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<i64>,
}

impl NewTodo {
    /// Creates a medium-priority task input with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::{NewTodo, Priority};
    use crate::model::validation::ValidationError;

    #[test]
    fn priority_parses_source_names_only() {
        assert_eq!("High".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(Priority::default(), Priority::Medium);
        assert!(matches!(
            "urgent".parse::<Priority>(),
            Err(ValidationError::InvalidPriority(_))
        ));
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = NewTodo::titled("   ").validate().unwrap_err();
        assert_eq!(err, ValidationError::BlankField("title"));
    }
}
