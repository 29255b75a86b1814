use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::TodoChanges,
    todos::TodoService,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

/// Body of `POST /todos`.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Body of `PUT /todos/{id}`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl From<UpdateTodoRequest> for TodoChanges {
    fn from(req: UpdateTodoRequest) -> Self {
        TodoChanges::new(req.title.as_deref(), req.description.as_deref(), req.completed)
    }
}

/// Lists the authenticated user's todos, newest first.
///
/// ## Responses:
/// - `200 OK`: `{"todos": [...]}`.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn list_todos(
    service: web::Data<TodoService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todos = service.list(user.username()).await?;
    Ok(HttpResponse::Ok().json(json!({ "todos": todos })))
}

/// Creates a todo owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: `{"todo": {...}}` with `completed: false`.
/// - `400 Bad Request`: missing or empty title, or a field over its length limit.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_todo(
    service: web::Data<TodoService>,
    user: AuthenticatedUser,
    body: web::Json<CreateTodoRequest>,
) -> Result<impl Responder, AppError> {
    let Some(title) = body.title.as_deref() else {
        return Err(AppError::InvalidInput("Title is required".into()));
    };

    let todo = service
        .create(user.username(), title, body.description.as_deref())
        .await?;

    Ok(HttpResponse::Created().json(json!({ "todo": todo })))
}

/// Updates any subset of title, description and completed.
///
/// ## Responses:
/// - `200 OK`: `{"todo": {...}}`.
/// - `400 Bad Request`: malformed id or invalid field values.
/// - `404 Not Found`: no todo with this id belongs to the caller.
#[put("/{id}")]
pub async fn update_todo(
    service: web::Data<TodoService>,
    user: AuthenticatedUser,
    todo_id: web::Path<String>,
    body: web::Json<UpdateTodoRequest>,
) -> Result<impl Responder, AppError> {
    let todo = service
        .update(user.username(), &todo_id, body.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "todo": todo })))
}

/// Deletes a todo.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Todo deleted successfully"}`.
/// - `400 Bad Request`: malformed id.
/// - `404 Not Found`: no todo with this id belongs to the caller.
#[delete("/{id}")]
pub async fn delete_todo(
    service: web::Data<TodoService>,
    user: AuthenticatedUser,
    todo_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    service.delete(user.username(), &todo_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Todo deleted successfully" })))
}

/// Flips the completed flag.
///
/// ## Responses:
/// - `200 OK`: `{"todo": {...}}`.
/// - `400 Bad Request`: malformed id.
/// - `404 Not Found`: no todo with this id belongs to the caller.
#[patch("/{id}/toggle")]
pub async fn toggle_todo(
    service: web::Data<TodoService>,
    user: AuthenticatedUser,
    todo_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let todo = service.toggle(user.username(), &todo_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "todo": todo })))
}
