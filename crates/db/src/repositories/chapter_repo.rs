//! Repository for the `chapters` table.

use fictsu_core::types::DbId;
use sqlx::PgPool;

use crate::models::chapter::{Chapter, CreateChapter, UpdateChapter};
use crate::update::{UpdateBuilder, UpdateError};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "fiction_id, id, title, content, created";

/// Provides CRUD operations for chapters, always scoped to a fiction.
pub struct ChapterRepo;

impl ChapterRepo {
    /// Insert a chapter with the next id above the fiction's current max.
    ///
    /// The id is computed inside the insert, so ids never go backwards;
    /// gaps left by deletions below the max are not reused. Two concurrent
    /// inserts for the same fiction can still collide on the primary key
    /// and surface as a unique violation.
    pub async fn create(
        pool: &PgPool,
        fiction_id: DbId,
        input: &CreateChapter,
    ) -> Result<Chapter, sqlx::Error> {
        let query = format!(
            "INSERT INTO chapters (fiction_id, id, title, content)
             SELECT $1::BIGINT, COALESCE(MAX(id), 0) + 1, $2::TEXT, $3::TEXT
             FROM chapters WHERE fiction_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Chapter>(&query)
            .bind(fiction_id)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find one chapter of a fiction.
    pub async fn find(
        pool: &PgPool,
        fiction_id: DbId,
        id: DbId,
    ) -> Result<Option<Chapter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chapters WHERE fiction_id = $1 AND id = $2");
        sqlx::query_as::<_, Chapter>(&query)
            .bind(fiction_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a chapter exists.
    pub async fn exists(pool: &PgPool, fiction_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM chapters WHERE fiction_id = $1 AND id = $2)",
        )
        .bind(fiction_id)
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// List a fiction's chapters in reading order.
    pub async fn list_by_fiction(
        pool: &PgPool,
        fiction_id: DbId,
    ) -> Result<Vec<Chapter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chapters WHERE fiction_id = $1 ORDER BY id");
        sqlx::query_as::<_, Chapter>(&query)
            .bind(fiction_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update to one chapter. Returns the affected row count.
    pub async fn update(
        pool: &PgPool,
        fiction_id: DbId,
        id: DbId,
        input: &UpdateChapter,
    ) -> Result<u64, UpdateError> {
        let mut query = UpdateBuilder::new("chapters")
            .set("title", input.title.as_deref())
            .set("content", input.content.as_deref())
            .finish(&[("fiction_id", fiction_id), ("id", id)])?;

        let result = query.build().execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Delete one chapter. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, fiction_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chapters WHERE fiction_id = $1 AND id = $2")
            .bind(fiction_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
