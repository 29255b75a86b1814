use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A registered account as held by the credential store.
///
/// Users are never mutated or deleted once created.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    /// Unique, case-sensitive login name.
    pub username: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Public view of a user, returned by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Normalised registration input. The username is already trimmed.
#[derive(Debug, Validate)]
pub struct Credentials {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username must be between 3 and 50 characters"
    ))]
    pub username: String,
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password must be between 6 and 128 characters"
    ))]
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            password: password.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_credentials_validation() {
        assert!(Credentials::new("alice", "password123").validate().is_ok());

        // Username is trimmed before its length is checked
        let padded = Credentials::new("  al  ", "password123");
        assert_eq!(padded.username, "al");
        assert!(padded.validate().is_err());

        assert!(Credentials::new(&"a".repeat(50), "secret").validate().is_ok());
        assert!(Credentials::new(&"a".repeat(51), "secret").validate().is_err());
    }

    #[test]
    fn test_password_length_bounds() {
        assert!(Credentials::new("alice", "12345").validate().is_err());
        assert!(Credentials::new("alice", "123456").validate().is_ok());
        assert!(Credentials::new("alice", &"p".repeat(128)).validate().is_ok());
        assert!(Credentials::new("alice", &"p".repeat(129)).validate().is_err());
    }

    #[test]
    fn test_profile_from_user_drops_hash() {
        let user = User::new("alice".into(), "$2b$04$hash".into());
        let created_at = user.created_at;
        let profile = Profile::from(user);

        assert_eq!(profile.username, "alice");
        assert_eq!(profile.created_at, created_at);
    }
}
