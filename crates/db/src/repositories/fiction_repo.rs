//! Repository for the `fictions` table.

use fictsu_core::types::DbId;
use sqlx::PgPool;

use crate::models::fiction::{CreateFiction, Fiction, UpdateFiction};
use crate::update::{UpdateBuilder, UpdateError};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, contributor_id, contributor_name, cover, title, \
                       subtitle, author, artist, status, synopsis, created";

/// Same columns qualified with the `f` alias, for joins.
const F_COLUMNS: &str = "f.id, f.contributor_id, f.contributor_name, f.cover, f.title, \
                         f.subtitle, f.author, f.artist, f.status, f.synopsis, f.created";

/// Provides CRUD operations for fictions.
pub struct FictionRepo;

impl FictionRepo {
    /// Insert a new fiction, returning the created row with its server
    /// assigned id and timestamp.
    pub async fn create(pool: &PgPool, input: &CreateFiction) -> Result<Fiction, sqlx::Error> {
        let query = format!(
            "INSERT INTO fictions
                (contributor_id, contributor_name, title, subtitle, author, artist, status, synopsis)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Fiction>(&query)
            .bind(input.contributor_id)
            .bind(&input.contributor_name)
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(&input.author)
            .bind(&input.artist)
            .bind(input.status.as_str())
            .bind(&input.synopsis)
            .fetch_one(pool)
            .await
    }

    /// Find a fiction by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Fiction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fictions WHERE id = $1");
        sqlx::query_as::<_, Fiction>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up only the contributor of a fiction. `None` if it does not exist.
    pub async fn find_contributor_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT contributor_id FROM fictions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every fiction, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Fiction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fictions ORDER BY created DESC, id DESC");
        sqlx::query_as::<_, Fiction>(&query).fetch_all(pool).await
    }

    /// List the fictions contributed by a user, newest first.
    pub async fn list_by_contributor(
        pool: &PgPool,
        contributor_id: DbId,
    ) -> Result<Vec<Fiction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM fictions WHERE contributor_id = $1
             ORDER BY created DESC, id DESC"
        );
        sqlx::query_as::<_, Fiction>(&query)
            .bind(contributor_id)
            .fetch_all(pool)
            .await
    }

    /// List the fictions a user has favorited.
    pub async fn list_favorited_by(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Fiction>, sqlx::Error> {
        let query = format!(
            "SELECT {F_COLUMNS}
             FROM user_favorite_fictions uf
             JOIN fictions f ON uf.fiction_id = f.id
             WHERE uf.user_id = $1
             ORDER BY f.title, f.id"
        );
        sqlx::query_as::<_, Fiction>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update. Only present fields in `input` are written.
    ///
    /// Returns the number of affected rows (0 if the fiction vanished).
    /// An empty patch fails with [`UpdateError::NoFieldsProvided`] without
    /// touching the pool.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFiction,
    ) -> Result<u64, UpdateError> {
        let mut query = UpdateBuilder::new("fictions")
            .set("title", input.title.as_deref())
            .set("subtitle", input.subtitle.as_deref())
            .set("author", input.author.as_deref())
            .set("artist", input.artist.as_deref())
            .set("status", input.status.map(|s| s.as_str()))
            .set("synopsis", input.synopsis.as_deref())
            .set("cover", input.cover.as_deref())
            .finish(&[("id", id)])?;

        let result = query.build().execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Set the cover URL. Returns `true` if the row exists.
    pub async fn set_cover(pool: &PgPool, id: DbId, url: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE fictions SET cover = $1 WHERE id = $2")
            .bind(url)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a fiction (chapters, genres and favorites cascade).
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM fictions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
