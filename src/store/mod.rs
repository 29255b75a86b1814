//! Persistence seams for users and todos.
//!
//! Services depend on the `UserStore` and `TodoStore` traits and receive a concrete store
//! at construction time. Two implementations exist: `PgStore` (Postgres via `sqlx`) and
//! `MemoryStore` (process-local maps, used in development mode and in tests).
//!
//! Every todo operation takes the owner alongside the id; an id on its own never resolves
//! to a record.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Todo, TodoChanges, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Credential store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact, case-sensitive lookup.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Persists a new user. Fails with `AppError::Conflict` if the username is taken.
    async fn insert(&self, user: &User) -> Result<User, AppError>;
}

/// Todo store. All lookups and mutations filter by `id` and `owner` together.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn insert(&self, todo: &Todo) -> Result<Todo, AppError>;

    async fn find_one(&self, id: Uuid, owner: &str) -> Result<Option<Todo>, AppError>;

    /// All todos of `owner`, newest first.
    async fn find_by_owner(&self, owner: &str) -> Result<Vec<Todo>, AppError>;

    /// Applies `changes` and sets `updated_at`. Returns the number of matched records.
    async fn update(
        &self,
        id: Uuid,
        owner: &str,
        changes: &TodoChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, AppError>;

    /// Returns the number of deleted records.
    async fn delete(&self, id: Uuid, owner: &str) -> Result<u64, AppError>;
}
