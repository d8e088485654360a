//! Domain errors shared by the db and api crates.
//!
//! Each variant corresponds to one HTTP status in the api error mapper.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A fiction, chapter or user row does not exist.
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: DbId },

    /// Input that breaks a field rule (blank title, unknown status, bad
    /// image type, oversized message).
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The request collides with existing state, e.g. a repeated favorite.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No session, or a session that failed verification.
    #[error("Not logged in: {0}")]
    Unauthorized(String),

    /// Logged in, but not the fiction's contributor.
    #[error("Not permitted: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
