//! Shared response body types for API handlers.

use serde::Serialize;

/// `{ "message": ... }` body returned by mutations that have nothing else
/// to report.
///
/// # Example
///
/// ```ignore
/// Ok(Json(MessageResponse::new("Fiction deleted successfully")))
/// ```
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
