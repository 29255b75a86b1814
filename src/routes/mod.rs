pub mod auth;
pub mod health;
pub mod todos;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::error::AppError;

/// Mounts the auth and todo endpoints. Intended to be configured inside the `/api` scope,
/// wrapped by `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::profile),
    )
    .service(
        web::scope("/todos")
            .service(todos::list_todos)
            .service(todos::create_todo)
            .service(todos::update_todo)
            .service(todos::delete_todo)
            .service(todos::toggle_todo),
    );
}

/// JSON extractor settings that report malformed bodies as `{"error": ...}` with status 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!("Invalid JSON payload: {}", e),
        _ => "Invalid JSON payload".to_string(),
    };
    AppError::InvalidInput(message).into()
}
