//! Task model & view projection for daylist.

/// Validation errors.
pub mod error;
/// Identifier types.
pub mod id;
/// Priority, filter and sort order enums.
pub mod state;
/// Case-insensitive text search.
pub mod text_matcher;
/// Derived views: search, filter, sort and statistics.
pub mod view;

pub use error::ValidationError;
pub use id::TaskId;
pub use state::{Filter, Priority, SortOrder};
pub use text_matcher::TextMatcher;
pub use view::{ViewQuery, ViewStats, format_relative_date, is_overdue, project, stats};

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

time::serde::format_description!(due_date_format, Date, "[year]-[month]-[day]");

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier of the task.
    pub id: TaskId,
    /// Trimmed, non-empty text.
    pub text: String,
    /// Whether the task is done.
    #[serde(default)]
    pub completed: bool,
    /// Importance.
    #[serde(default)]
    pub priority: Priority,
    /// Optional deadline (calendar day, no time component).
    #[serde(default, with = "due_date_format::option")]
    pub due_date: Option<Date>,
    /// Creation instant.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Task {
    /// Build a new, incomplete task.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyText`] when `text` is blank after trimming.
    pub fn new(
        id: TaskId,
        text: &str,
        priority: Priority,
        due_date: Option<Date>,
        created_at: OffsetDateTime,
    ) -> Result<Self, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        Ok(Self {
            id,
            text: text.to_owned(),
            completed: false,
            priority,
            due_date,
            created_at,
        })
    }

    /// Copy of this task with `completed` flipped.
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// Parse a raw due date input. Blank input means "no deadline".
///
/// # Errors
/// Returns [`ValidationError::InvalidDueDate`] when the input is not a `YYYY-MM-DD` date.
pub fn parse_due_date(raw: &str) -> Result<Option<Date>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
        .map(Some)
        .map_err(|_| ValidationError::InvalidDueDate {
            input: raw.to_owned(),
        })
}

/// Decode a persisted task list.
///
/// # Errors
/// Returns the JSON error when the blob is not a task array.
pub fn decode_tasks(blob: &str) -> Result<Vec<Task>, serde_json::Error> {
    serde_json::from_str(blob)
}

/// Encode a task list for persistence.
///
/// # Errors
/// Returns the JSON error if serialization fails.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string(tasks)
}
