//! Favorite (user ↔ fiction) join model.

use serde::Serialize;

/// Result of trying to favorite a fiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddFavoriteOutcome {
    /// A new row was inserted.
    Added,
    /// The `(user, fiction)` pair already existed.
    AlreadyFavorited,
    /// The fiction (or user) does not exist.
    FictionMissing,
}

/// Response body for the favorite endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteStatus {
    pub is_favorited: bool,
}
