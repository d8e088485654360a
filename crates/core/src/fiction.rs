//! Fiction and chapter domain rules.
//!
//! Publication status enum, field length limits, and the validation helpers
//! the create/edit handlers run before touching the database.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length (in characters) of a fiction or chapter title.
pub const MAX_TITLE_LEN: usize = 255;

/// Maximum length (in characters) of the short text fields
/// (subtitle, author, artist).
pub const MAX_SHORT_FIELD_LEN: usize = 255;

/// Content types accepted for cover and chapter image uploads.
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp", "image/gif"];

/// Maximum accepted upload size for a single image (10 MiB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Publication status of a fiction, stored as its name in `fictions.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FictionStatus {
    Completed,
    Ongoing,
    Hiatus,
    Dropped,
}

impl FictionStatus {
    /// All statuses, in display order.
    pub const ALL: [FictionStatus; 4] = [
        FictionStatus::Completed,
        FictionStatus::Ongoing,
        FictionStatus::Hiatus,
        FictionStatus::Dropped,
    ];

    /// The value stored in the database and sent over the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            FictionStatus::Completed => "Completed",
            FictionStatus::Ongoing => "Ongoing",
            FictionStatus::Hiatus => "Hiatus",
            FictionStatus::Dropped => "Dropped",
        }
    }
}

impl fmt::Display for FictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FictionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FictionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid status '{s}'. Must be one of: Completed, Ongoing, Hiatus, Dropped"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// A title must contain at least one non-whitespace character and fit the
/// column limit.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be blank".into()));
    }
    validate_len("title", title, MAX_TITLE_LEN)
}

/// Check a free-text field against a maximum character count.
pub fn validate_len(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "Field '{field}' must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Validate an uploaded image's content type and size.
pub fn validate_image(content_type: &str, len: usize) -> Result<(), CoreError> {
    if !ACCEPTED_IMAGE_TYPES.contains(&content_type) {
        return Err(CoreError::Validation(format!(
            "Unsupported image type '{content_type}'. Supported: {ACCEPTED_IMAGE_TYPES:?}"
        )));
    }
    if len == 0 {
        return Err(CoreError::Validation("Uploaded image is empty".into()));
    }
    if len > MAX_IMAGE_BYTES {
        return Err(CoreError::Validation(format!(
            "Uploaded image exceeds the {MAX_IMAGE_BYTES} byte limit"
        )));
    }
    Ok(())
}

/// Parse a comma-separated list of genre ids (`"1, 4,7"`). Blank input is
/// an empty list; duplicates are dropped, order is kept.
pub fn parse_genre_ids(raw: &str) -> Result<Vec<DbId>, CoreError> {
    let mut ids = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id: DbId = part
            .parse()
            .map_err(|_| CoreError::Validation(format!("Invalid genre id '{part}'")))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

// ---------------------------------------------------------------------------
// Object paths
// ---------------------------------------------------------------------------

/// Object-store path of a fiction's cover: `<prefix><fiction_id>`.
///
/// Re-uploading a cover overwrites the previous object.
pub fn cover_object_path(prefix: &str, fiction_id: DbId) -> String {
    format!("{prefix}{fiction_id}")
}

/// Object-store path of an image attached to a chapter.
///
/// `unique` keeps several images per chapter apart.
pub fn chapter_image_object_path(
    prefix: &str,
    fiction_id: DbId,
    chapter_id: DbId,
    unique: &str,
) -> String {
    format!("{prefix}{fiction_id}/{chapter_id}/{unique}")
}
