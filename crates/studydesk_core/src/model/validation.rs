//! Field-level validation errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure raised before a record is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty after trimming.
    BlankField(&'static str),
    /// A clock value is not `HH:MM` in 24h notation.
    InvalidTime { field: &'static str, value: String },
    /// `end_time` is not strictly after `start_time`.
    EmptyTimeRange { start: String, end: String },
    /// Color is not `#RRGGBB`.
    InvalidColor(String),
    /// Weekday name is not one of Monday..Sunday.
    InvalidWeekday(String),
    /// Priority name is not one of Low/Medium/High.
    InvalidPriority(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::InvalidTime { field, value } => {
                write!(f, "`{field}` must be HH:MM, got `{value}`")
            }
            Self::EmptyTimeRange { start, end } => {
                write!(f, "end time `{end}` must be after start time `{start}`")
            }
            Self::InvalidColor(value) => write!(f, "color must be #RRGGBB, got `{value}`"),
            Self::InvalidWeekday(value) => write!(f, "unknown weekday `{value}`"),
            Self::InvalidPriority(value) => write!(f, "unknown priority `{value}`"),
        }
    }
}

impl Error for ValidationError {}

/// Returns `Ok(())` when `value` contains at least one non-whitespace char.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}
