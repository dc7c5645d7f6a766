//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::ports::NotifyError;

/// Domain errors - business logic failures.
///
/// Form validation failures are not errors: they come back as a rendered
/// page carrying [`FieldErrors`](crate::forms::FieldErrors).
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Authentication required")]
    Unauthorized,

    #[error("Not allowed to modify {entity_type} {id}")]
    Forbidden { entity_type: &'static str, id: Uuid },

    #[error("Notification failed: {0}")]
    Notification(#[from] NotifyError),

    #[error("Storage failure: {0}")]
    Store(#[from] RepoError),
}

impl DomainError {
    pub fn post_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "Post",
            id,
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
