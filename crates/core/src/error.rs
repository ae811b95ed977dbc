use crate::checklist::validate::SubmissionRejection;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced user does not exist or does not hold the required role.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// An evaluation submission failed completeness or structural validation.
    #[error("Submission rejected: {0}")]
    Submission(SubmissionRejection),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
