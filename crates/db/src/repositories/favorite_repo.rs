//! Repository for the `user_favorite_fictions` join table.

use fictsu_core::types::DbId;
use sqlx::PgPool;

use crate::models::favorite::AddFavoriteOutcome;

/// PostgreSQL SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Provides favorite add/remove/check for a user.
pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Favorite a fiction.
    ///
    /// The unique constraint is the duplicate check: a violation is the
    /// expected "already favorited" outcome, not an error.
    pub async fn add(
        pool: &PgPool,
        user_id: DbId,
        fiction_id: DbId,
    ) -> Result<AddFavoriteOutcome, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO user_favorite_fictions (user_id, fiction_id) VALUES ($1, $2)",
        )
        .bind(user_id)
        .bind(fiction_id)
        .execute(pool)
        .await;

        match result {
            Ok(_) => Ok(AddFavoriteOutcome::Added),
            Err(sqlx::Error::Database(db_err)) => match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => Ok(AddFavoriteOutcome::AlreadyFavorited),
                Some(FOREIGN_KEY_VIOLATION) => Ok(AddFavoriteOutcome::FictionMissing),
                _ => Err(sqlx::Error::Database(db_err)),
            },
            Err(other) => Err(other),
        }
    }

    /// Remove a favorite. Returns `true` if a row was removed.
    pub async fn remove(pool: &PgPool, user_id: DbId, fiction_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM user_favorite_fictions WHERE user_id = $1 AND fiction_id = $2",
        )
        .bind(user_id)
        .bind(fiction_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether the user has favorited the fiction.
    pub async fn exists(pool: &PgPool, user_id: DbId, fiction_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM user_favorite_fictions WHERE user_id = $1 AND fiction_id = $2
             )",
        )
        .bind(user_id)
        .bind(fiction_id)
        .fetch_one(pool)
        .await
    }
}
