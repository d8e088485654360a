//! User entity model and DTOs.

use fictsu_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::fiction::FictionWithChapters;

/// A user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    /// Identifier issued by the OAuth provider.
    pub user_id: String,
    pub super_user: bool,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub joined: Timestamp,
}

/// DTO for registering a user on first login.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
}

/// Profile returned by `GET /user`: the user plus derived fiction lists.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub fav_fictions: Vec<FictionWithChapters>,
    pub contributed_fictions: Vec<FictionWithChapters>,
}
