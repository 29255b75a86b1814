use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{TodoStore, UserStore};
use crate::error::AppError;
use crate::models::{Todo, TodoChanges, User};

/// In-process store with the same matching rules as `PgStore`.
///
/// Each call takes the lock once, so single-record operations are atomic just like the
/// single-statement queries of the Postgres store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    todos: RwLock<HashMap<Uuid, Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn insert(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(AppError::Conflict("User already exists".into()));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user.clone())
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert(&self, todo: &Todo) -> Result<Todo, AppError> {
        let mut todos = self.todos.write().await;
        if todos.contains_key(&todo.id) {
            return Err(AppError::DatabaseError(format!(
                "duplicate todo id {}",
                todo.id
            )));
        }
        todos.insert(todo.id, todo.clone());
        Ok(todo.clone())
    }

    async fn find_one(&self, id: Uuid, owner: &str) -> Result<Option<Todo>, AppError> {
        Ok(self
            .todos
            .read()
            .await
            .get(&id)
            .filter(|todo| todo.owner == owner)
            .cloned())
    }

    async fn find_by_owner(&self, owner: &str) -> Result<Vec<Todo>, AppError> {
        let mut todos: Vec<Todo> = self
            .todos
            .read()
            .await
            .values()
            .filter(|todo| todo.owner == owner)
            .cloned()
            .collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(todos)
    }

    async fn update(
        &self,
        id: Uuid,
        owner: &str,
        changes: &TodoChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let mut todos = self.todos.write().await;
        match todos.get_mut(&id).filter(|todo| todo.owner == owner) {
            Some(todo) => {
                todo.apply(changes, updated_at);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: Uuid, owner: &str) -> Result<u64, AppError> {
        let mut todos = self.todos.write().await;
        let owned = todos.get(&id).is_some_and(|todo| todo.owner == owner);
        if owned {
            todos.remove(&id);
            Ok(1)
        } else {
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTodo;
    use pretty_assertions::assert_eq;

    fn todo(title: &str, owner: &str) -> Todo {
        Todo::new(NewTodo::new(title, None), owner)
    }

    #[actix_rt::test]
    async fn test_username_is_unique_and_case_sensitive() {
        let store = MemoryStore::new();
        let user = User::new("alice".into(), "hash".into());

        UserStore::insert(&store, &user).await.unwrap();
        assert_eq!(
            UserStore::insert(&store, &user).await,
            Err(AppError::Conflict("User already exists".into()))
        );

        let upper = User::new("Alice".into(), "hash".into());
        assert!(UserStore::insert(&store, &upper).await.is_ok());
        assert!(store.find_by_username("ALICE").await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_find_one_requires_matching_owner() {
        let store = MemoryStore::new();
        let stored = TodoStore::insert(&store, &todo("Mine", "alice")).await.unwrap();

        assert!(store.find_one(stored.id, "alice").await.unwrap().is_some());
        assert!(store.find_one(stored.id, "bob").await.unwrap().is_none());
        assert!(store.find_one(Uuid::new_v4(), "alice").await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_update_and_delete_report_match_counts() {
        let store = MemoryStore::new();
        let stored = TodoStore::insert(&store, &todo("Mine", "alice")).await.unwrap();
        let changes = TodoChanges::completed(true);

        assert_eq!(store.update(stored.id, "bob", &changes, Utc::now()).await.unwrap(), 0);
        assert_eq!(store.delete(stored.id, "bob").await.unwrap(), 0);
        assert!(!store.find_one(stored.id, "alice").await.unwrap().unwrap().completed);

        assert_eq!(store.update(stored.id, "alice", &changes, Utc::now()).await.unwrap(), 1);
        assert!(store.find_one(stored.id, "alice").await.unwrap().unwrap().completed);

        assert_eq!(store.delete(stored.id, "alice").await.unwrap(), 1);
        assert_eq!(store.delete(stored.id, "alice").await.unwrap(), 0);
    }

    #[actix_rt::test]
    async fn test_find_by_owner_is_newest_first() {
        let store = MemoryStore::new();
        let mut first = todo("First", "alice");
        let mut second = todo("Second", "alice");
        first.created_at = Utc::now() - chrono::Duration::minutes(5);
        second.created_at = Utc::now();

        TodoStore::insert(&store, &first).await.unwrap();
        TodoStore::insert(&store, &second).await.unwrap();
        TodoStore::insert(&store, &todo("Other", "bob")).await.unwrap();

        let titles: Vec<String> = store
            .find_by_owner("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["Second", "First"]);
        assert!(store.find_by_owner("carol").await.unwrap().is_empty());
    }
}
