//! Ownership-scoped todo operations.
//!
//! Every operation takes the authenticated owner and passes it to the store together with
//! the todo id. A todo that does not exist and a todo that belongs to someone else are
//! indistinguishable to the caller: both are `NotFound`.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{NewTodo, Todo, TodoChanges};
use crate::store::TodoStore;

fn not_found() -> AppError {
    AppError::NotFound("Todo not found".into())
}

/// Parses a client-supplied todo id.
pub fn parse_todo_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::InvalidId("Invalid todo ID".into()))
}

pub struct TodoService {
    todos: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(todos: Arc<dyn TodoStore>) -> Self {
        Self { todos }
    }

    /// Creates a todo for `owner`. Title and description are trimmed.
    pub async fn create(
        &self,
        owner: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<Todo, AppError> {
        let input = NewTodo::new(title, description);
        input.validate()?;

        let todo = self.todos.insert(&Todo::new(input, owner)).await?;
        log::info!("Created todo {} for {}", todo.id, owner);
        Ok(todo)
    }

    /// All todos of `owner`, newest first. No todos is an empty list.
    pub async fn list(&self, owner: &str) -> Result<Vec<Todo>, AppError> {
        self.todos.find_by_owner(owner).await
    }

    /// Applies a partial update. `updated_at` is refreshed even when `changes` is empty.
    pub async fn update(
        &self,
        owner: &str,
        id: &str,
        changes: TodoChanges,
    ) -> Result<Todo, AppError> {
        let id = parse_todo_id(id)?;
        changes.validate()?;

        if changes.is_empty() {
            log::debug!("Empty update for todo {}", id);
        }

        let matched = self.todos.update(id, owner, &changes, Utc::now()).await?;
        if matched == 0 {
            return Err(not_found());
        }

        self.todos.find_one(id, owner).await?.ok_or_else(not_found)
    }

    pub async fn delete(&self, owner: &str, id: &str) -> Result<(), AppError> {
        let id = parse_todo_id(id)?;

        let deleted = self.todos.delete(id, owner).await?;
        if deleted == 0 {
            return Err(not_found());
        }

        log::info!("Deleted todo {} for {}", id, owner);
        Ok(())
    }

    /// Flips `completed`.
    ///
    /// This is a read followed by a separate write. Two concurrent toggles by the same
    /// owner may both read the same value, in which case the last write wins.
    pub async fn toggle(&self, owner: &str, id: &str) -> Result<Todo, AppError> {
        let id = parse_todo_id(id)?;

        let current = self.todos.find_one(id, owner).await?.ok_or_else(not_found)?;
        let changes = TodoChanges::completed(!current.completed);

        let matched = self.todos.update(id, owner, &changes, Utc::now()).await?;
        if matched == 0 {
            return Err(not_found());
        }

        self.todos.find_one(id, owner).await?.ok_or_else(not_found)
    }
}
