use async_trait::async_trait;
use thiserror::Error;

use crate::models::Goal;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("User id must not be empty")]
    InvalidUser,
}

/// Durable storage for each user's goal set.
///
/// Callers are expected to have authorized `user_id` already; backends only
/// key records by it.
#[async_trait]
pub trait GoalRepository: Send + Sync {
    /// Goals for `user_id` in their saved order. Unknown users have none.
    async fn load(&self, user_id: &str) -> Result<Vec<Goal>, RepositoryError>;

    /// Replaces the whole goal set for `user_id`.
    async fn save(&self, user_id: &str, goals: &[Goal]) -> Result<(), RepositoryError>;

    /// Every user with at least one stored goal, sorted.
    async fn list_users(&self) -> Result<Vec<String>, RepositoryError>;
}

/// Rejects empty or whitespace-only user ids.
pub fn validate_user_id(user_id: &str) -> Result<&str, RepositoryError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        Err(RepositoryError::InvalidUser)
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_user_id_trims() {
        assert_eq!(validate_user_id("  alice "), Ok("alice"));
    }

    #[test]
    fn validate_user_id_rejects_blank() {
        assert_eq!(validate_user_id("   "), Err(RepositoryError::InvalidUser));
    }
}
