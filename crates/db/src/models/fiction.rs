//! Fiction entity model and DTOs.

use fictsu_core::fiction::FictionStatus;
use fictsu_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::chapter::Chapter;
use crate::models::genre::Genre;

/// A fiction row from the `fictions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Fiction {
    pub id: DbId,
    pub contributor_id: DbId,
    pub contributor_name: String,
    /// Public URL of the cover image, empty until one is uploaded.
    pub cover: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub artist: String,
    pub status: String,
    pub synopsis: String,
    pub created: Timestamp,
}

/// Full read model for `GET /f/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct FictionDetail {
    #[serde(flatten)]
    pub fiction: Fiction,
    pub genres: Vec<Genre>,
    pub chapters: Vec<Chapter>,
}

/// A fiction with its chapters, as listed on a user profile.
#[derive(Debug, Clone, Serialize)]
pub struct FictionWithChapters {
    #[serde(flatten)]
    pub fiction: Fiction,
    pub chapters: Vec<Chapter>,
}

/// DTO for creating a fiction. Contributor fields come from the session.
#[derive(Debug, Clone)]
pub struct CreateFiction {
    pub contributor_id: DbId,
    pub contributor_name: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub artist: String,
    pub status: FictionStatus,
    pub synopsis: String,
}

/// DTO for editing a fiction. `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateFiction {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub artist: Option<String>,
    pub status: Option<FictionStatus>,
    pub synopsis: Option<String>,
    pub cover: Option<String>,
}

impl UpdateFiction {
    /// Whether no field at all is present.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subtitle.is_none()
            && self.author.is_none()
            && self.artist.is_none()
            && self.status.is_none()
            && self.synopsis.is_none()
            && self.cover.is_none()
    }
}
