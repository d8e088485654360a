//! Genre entity model.

use fictsu_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A genre row from the `genres` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Genre {
    pub id: DbId,
    pub genre_name: String,
}
