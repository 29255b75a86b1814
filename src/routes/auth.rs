use crate::{
    auth::{AuthService, AuthenticatedUser, CredentialsRequest},
    error::AppError,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;

/// Register a new user
///
/// ## Responses:
/// - `201 Created`: `{"message": "User registered successfully"}`.
/// - `400 Bad Request`: missing fields, or username/password out of range.
/// - `409 Conflict`: the username is already taken.
#[post("/register")]
pub async fn register(
    service: web::Data<AuthService>,
    body: web::Json<CredentialsRequest>,
) -> Result<impl Responder, AppError> {
    service.register(&body.username, &body.password).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully"
    })))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `{"access_token": "...", "user": {"username": "..."}}`.
/// - `400 Bad Request`: missing fields.
/// - `401 Unauthorized`: `{"error": "Invalid credentials"}` for an unknown user or a wrong password.
#[post("/login")]
pub async fn login(
    service: web::Data<AuthService>,
    body: web::Json<CredentialsRequest>,
) -> Result<impl Responder, AppError> {
    let session = service.login(&body.username, &body.password).await?;
    Ok(HttpResponse::Ok().json(session))
}

/// Profile of the authenticated user
///
/// ## Responses:
/// - `200 OK`: `{"username": "...", "created_at": "..."}`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: the token is valid but the user record does not exist.
#[get("/profile")]
pub async fn profile(
    service: web::Data<AuthService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let profile = service.profile(user.username()).await?;
    Ok(HttpResponse::Ok().json(profile))
}
