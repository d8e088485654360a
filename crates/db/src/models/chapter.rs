//! Chapter entity model and DTOs.

use fictsu_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A chapter row from the `chapters` table, keyed by `(fiction_id, id)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Chapter {
    pub fiction_id: DbId,
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub created: Timestamp,
}

/// DTO for creating a chapter. The id is assigned by the repository.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChapter {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// DTO for editing a chapter. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateChapter {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub content: Option<String>,
}
