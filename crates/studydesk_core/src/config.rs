//! Editor configuration.
//!
//! # Invariants
//! - `debounce_ms` is within `1..=MAX_DEBOUNCE_MS`.
//! - `default_category` and `placeholder_title` are non-blank.

use crate::model::note::{DEFAULT_NOTE_CATEGORY, PLACEHOLDER_NOTE_TITLE};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Quiet period after the last edit before a note is persisted.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;
/// Upper bound for the debounce window.
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Configuration error raised by `EditorConfig::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    DebounceOutOfRange(u64),
    BlankValue(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DebounceOutOfRange(value) => write!(
                f,
                "debounce_ms must be within 1..={MAX_DEBOUNCE_MS}, got {value}"
            ),
            Self::BlankValue(field) => write!(f, "`{field}` must not be blank"),
        }
    }
}

impl Error for ConfigError {}

/// Notes editor settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Debounce window in milliseconds.
    pub debounce_ms: u64,
    /// Category of new notes and of the empty draft.
    pub default_category: String,
    /// Title of notes created by the "new note" action.
    pub placeholder_title: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            default_category: DEFAULT_NOTE_CATEGORY.to_string(),
            placeholder_title: PLACEHOLDER_NOTE_TITLE.to_string(),
        }
    }
}

impl EditorConfig {
    /// Default config with a custom debounce window.
    pub fn with_debounce_ms(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 || self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::DebounceOutOfRange(self.debounce_ms));
        }
        if self.default_category.trim().is_empty() {
            return Err(ConfigError::BlankValue("default_category"));
        }
        if self.placeholder_title.trim().is_empty() {
            return Err(ConfigError::BlankValue("placeholder_title"));
        }
        Ok(())
    }
}
