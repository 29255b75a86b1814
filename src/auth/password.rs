use crate::error::AppError;

/// Salted bcrypt hash of `password`. `cost` is the log2 work factor (4..=31).
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    bcrypt::hash(password, cost).map_err(|e| {
        AppError::InternalServerError(format!("Password hashing failed: {}", e))
    })
}

/// Checks `password` against a stored hash. A malformed hash is an internal error, not a
/// mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    bcrypt::verify(password, password_hash).map_err(|e| {
        AppError::InternalServerError(format!("Password verification failed: {}", e))
    })
}
