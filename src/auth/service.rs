use std::sync::Arc;

use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenIssuer;
use crate::auth::{LoginResponse, UserSummary};
use crate::error::AppError;
use crate::models::{Credentials, Profile, User};
use crate::store::UserStore;

const REQUIRED_MESSAGE: &str = "Username and password are required";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Registration, login and profile lookup.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenIssuer, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
        }
    }

    /// Creates an account. The username is trimmed; usernames are case-sensitive.
    ///
    /// Fails with `InvalidInput` for missing or out-of-range fields and `Conflict` if the
    /// username is taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), AppError> {
        let credentials = Credentials::new(username, password);
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(AppError::InvalidInput(REQUIRED_MESSAGE.into()));
        }
        credentials.validate()?;

        if self
            .users
            .find_by_username(&credentials.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("User already exists".into()));
        }

        let cost = self.bcrypt_cost;
        let password = credentials.password;
        let password_hash = run_blocking(move || hash_password(&password, cost)).await?;

        // The store re-checks uniqueness, so a concurrent registration still ends in Conflict.
        let user = self
            .users
            .insert(&User::new(credentials.username, password_hash))
            .await?;

        log::info!("Registered user {}", user.username);
        Ok(())
    }

    /// Checks credentials and issues a session token.
    ///
    /// An unknown username and a wrong password produce the same `Unauthorized` error.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AppError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(REQUIRED_MESSAGE.into()));
        }

        let Some(user) = self.users.find_by_username(username).await? else {
            log::warn!("Failed login attempt");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        };

        let password = password.to_string();
        let stored_hash = user.password_hash.clone();
        let matches = run_blocking(move || verify_password(&password, &stored_hash)).await?;
        if !matches {
            log::warn!("Failed login attempt");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        let access_token = self.tokens.issue(&user.username)?;
        log::info!("User {} logged in", user.username);

        Ok(LoginResponse {
            access_token,
            user: UserSummary {
                username: user.username,
            },
        })
    }

    /// Looks up the profile of an already authenticated identity.
    pub async fn profile(&self, username: &str) -> Result<Profile, AppError> {
        self.users
            .find_by_username(username)
            .await?
            .map(Profile::from)
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }
}

/// Runs CPU-heavy bcrypt work off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Password task failed: {}", e)))?
}
