use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;
use todoforge::auth::{AuthMiddleware, AuthService, TokenIssuer};
use todoforge::config::Config;
use todoforge::routes::{self, health};
use todoforge::store::{MemoryStore, PgStore, TodoStore, UserStore};
use todoforge::todos::TodoService;

fn io_error(msg: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(msg.to_string())
}

fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if allowed_origins.is_empty() {
        return cors.allow_any_origin();
    }
    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        io_error(e)
    })?;

    let (users, todos): (Arc<dyn UserStore>, Arc<dyn TodoStore>) = match &config.database_url {
        Some(database_url) => {
            let pool = PgPool::connect(database_url).await.map_err(|e| {
                log::error!("Failed to connect to database: {}", e);
                io_error(e)
            })?;
            let store = Arc::new(PgStore::new(pool));
            store.migrate().await.map_err(io_error)?;
            log::info!("Using Postgres store");
            let users: Arc<dyn UserStore> = store.clone();
            let todos: Arc<dyn TodoStore> = store;
            (users, todos)
        }
        None => {
            log::warn!("DATABASE_URL not set; using in-memory store, data is lost on restart");
            let store = Arc::new(MemoryStore::new());
            let users: Arc<dyn UserStore> = store.clone();
            let todos: Arc<dyn TodoStore> = store;
            (users, todos)
        }
    };

    let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl);
    log::info!("Session tokens expire after {} hours", tokens.ttl().num_hours());
    let auth_service = web::Data::new(AuthService::new(users, tokens.clone(), config.bcrypt_cost));
    let todo_service = web::Data::new(TodoService::new(todos));
    let tokens = web::Data::new(tokens);
    let allowed_origins = config.allowed_origins.clone();

    log::info!("Starting todo server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(auth_service.clone())
            .app_data(todo_service.clone())
            .app_data(tokens.clone())
            .app_data(routes::json_config())
            .wrap(NormalizePath::trim())
            .wrap(cors(&allowed_origins))
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
