//! Repository for the `genres` table and its `fiction_genres` join.

use fictsu_core::types::DbId;
use sqlx::PgPool;

use crate::models::genre::Genre;

/// Read access to genres.
pub struct GenreRepo;

impl GenreRepo {
    /// List every known genre, alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>("SELECT id, genre_name FROM genres ORDER BY genre_name")
            .fetch_all(pool)
            .await
    }

    /// List the genres attached to a fiction, alphabetically.
    pub async fn list_by_fiction(
        pool: &PgPool,
        fiction_id: DbId,
    ) -> Result<Vec<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>(
            "SELECT g.id, g.genre_name
             FROM fiction_genres fg
             JOIN genres g ON fg.genre_id = g.id
             WHERE fg.fiction_id = $1
             ORDER BY g.genre_name",
        )
        .bind(fiction_id)
        .fetch_all(pool)
        .await
    }

    /// Replace a fiction's genres with `genre_ids`. Unknown ids are ignored.
    pub async fn set_for_fiction(
        pool: &PgPool,
        fiction_id: DbId,
        genre_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM fiction_genres WHERE fiction_id = $1")
            .bind(fiction_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO fiction_genres (fiction_id, genre_id)
             SELECT $1, g.id FROM genres g WHERE g.id = ANY($2)
             ON CONFLICT DO NOTHING",
        )
        .bind(fiction_id)
        .bind(genre_ids)
        .execute(&mut *tx)
        .await?;
        tx.commit().await
    }
}
