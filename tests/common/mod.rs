#![allow(dead_code)]

use std::sync::Arc;

use actix_cors::Cors;
use actix_http::Request;
use actix_web::body::{to_bytes, MessageBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{test, web, App};
use chrono::Duration;
use serde_json::{json, Value};
use todoforge::auth::{AuthMiddleware, AuthService, TokenIssuer};
use todoforge::routes::{self, health};
use todoforge::store::MemoryStore;
use todoforge::todos::TodoService;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Lowest cost bcrypt accepts; keeps the suites fast.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn token_issuer() -> TokenIssuer {
    TokenIssuer::new(TEST_SECRET, Duration::hours(24))
}

/// Shared state for one test app, backed by a fresh in-memory store.
#[derive(Clone)]
pub struct TestState {
    pub auth: web::Data<AuthService>,
    pub todos: web::Data<TodoService>,
    pub tokens: web::Data<TokenIssuer>,
}

impl TestState {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let tokens = token_issuer();
        Self {
            auth: web::Data::new(AuthService::new(
                store.clone(),
                tokens.clone(),
                TEST_BCRYPT_COST,
            )),
            todos: web::Data::new(TodoService::new(store)),
            tokens: web::Data::new(tokens),
        }
    }
}

/// Builds the same App as the binary, on a fresh in-memory store.
pub async fn init_app() -> impl Service<
    Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    let state = TestState::new();
    test::init_service(
        App::new()
            .app_data(state.auth.clone())
            .app_data(state.todos.clone())
            .app_data(state.tokens.clone())
            .app_data(routes::json_config())
            .wrap(NormalizePath::trim())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await
}

/// Sends a request and returns the status and the JSON body (`Null` if there is none).
///
/// Errors raised by middleware are rendered the way the server would render them.
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let body = test::read_body(resp).await;
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = to_bytes(resp.into_body()).await.unwrap();
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
    }
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Registers `username` and logs in, returning the access token.
pub async fn register_and_login<S, B>(app: &S, username: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let credentials = json!({ "username": username, "password": password });

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&credentials)
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(&credentials)
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);

    body["access_token"]
        .as_str()
        .expect("login response carries an access_token")
        .to_string()
}

/// Creates a todo and returns its JSON representation.
pub async fn create_todo<S, B>(app: &S, token: &str, title: &str, description: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/todos")
        .insert_header(bearer(token))
        .set_json(json!({ "title": title, "description": description }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["todo"].clone()
}
