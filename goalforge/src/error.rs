//! Error types for GoalForge
//!
//! All errors use thiserror for structured error handling.
//! Each user action handles its own failure and reports it as a notice;
//! nothing here is fatal.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Bad input shape: malformed email, short password, blank title.
    #[error("{0}")]
    Validation(String),

    /// Duplicate email or friend.
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or no logged-in user.
    #[error("{0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// True for errors caused by what the user typed rather than by the
    /// environment. These are shown verbatim; the rest get a generic prefix.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::Conflict(_) | AppError::Auth(_) | AppError::NotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_errors_display_plain_message() {
        let err = AppError::Validation("Please enter a valid email".to_string());
        assert_eq!(err.to_string(), "Please enter a valid email");
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_environment_errors_are_not_user_facing() {
        let err = AppError::Io(std::io::Error::other("disk full"));
        assert!(!err.is_user_facing());
        assert!(err.to_string().starts_with("IO error"));
    }
}
