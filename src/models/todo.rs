use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A todo item as stored and as returned by the API.
///
/// `owner` is the username of the creating account. It is never serialized: the API only
/// ever returns a user's own todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    /// Store-generated identifier (UUID v4).
    pub id: Uuid,
    #[serde(skip_serializing, default)]
    pub owner: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a new, not yet completed, todo owned by `owner`.
    /// Both timestamps are set to the current time.
    pub fn new(input: NewTodo, owner: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            title: input.title,
            description: input.description,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update in place and refreshes `updated_at`.
    pub fn apply(&mut self, changes: &TodoChanges, updated_at: DateTime<Utc>) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
        self.updated_at = updated_at;
    }
}

/// Validated input for creating a todo. Text fields are trimmed on construction.
#[derive(Debug, Clone, Validate)]
pub struct NewTodo {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: String,
}

impl NewTodo {
    pub fn new(title: &str, description: Option<&str>) -> Self {
        Self {
            title: title.trim().to_string(),
            description: description.map(str::trim).unwrap_or_default().to_string(),
        }
    }
}

/// A partial update. Absent fields are left untouched; present text fields are trimmed
/// and checked with the same limits as on creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct TodoChanges {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    pub fn new(title: Option<&str>, description: Option<&str>, completed: Option<bool>) -> Self {
        Self {
            title: title.map(|t| t.trim().to_string()),
            description: description.map(|d| d.trim().to_string()),
            completed,
        }
    }

    /// A change set that only flips the completion flag.
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}
