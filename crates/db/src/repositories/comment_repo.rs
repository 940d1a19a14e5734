//! Repository for the `comments` table.

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use softdesk_core::types::DbId;

use crate::models::comment::{Comment, CommentRow, NewComment};

const COLUMNS: &str = "id, description, issue_id, author_id, created_at, updated_at";

const ROW_COLUMNS: &str = "cm.id, cm.description, cm.issue_id, cm.author_id, \
     u.username AS author_username, cm.created_at, cm.updated_at";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment with a fresh UUID.
    ///
    /// Executor-generic so the author-is-contributor invariant check and
    /// this insert can share one transaction.
    pub async fn create<'e, E>(executor: E, input: &NewComment) -> Result<Comment, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO comments (id, description, issue_id, author_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(Uuid::new_v4())
            .bind(&input.description)
            .bind(input.issue_id)
            .bind(input.author_id)
            .fetch_one(executor)
            .await
    }

    /// Find a comment by its UUID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a comment in the joined API shape.
    pub async fn find_row_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<CommentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ROW_COLUMNS} FROM comments cm
             JOIN users u ON u.id = cm.author_id
             WHERE cm.id = $1"
        );
        sqlx::query_as::<_, CommentRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an issue's comments, oldest first (conversation order).
    pub async fn list_for_issue(
        pool: &PgPool,
        issue_id: DbId,
    ) -> Result<Vec<CommentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ROW_COLUMNS} FROM comments cm
             JOIN users u ON u.id = cm.author_id
             WHERE cm.issue_id = $1
             ORDER BY cm.created_at ASC"
        );
        sqlx::query_as::<_, CommentRow>(&query)
            .bind(issue_id)
            .fetch_all(pool)
            .await
    }

    /// Update a comment's description.
    ///
    /// Executor-generic for the same reason as [`CommentRepo::create`].
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        description: &str,
    ) -> Result<Option<Comment>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE comments SET description = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(description)
            .fetch_optional(executor)
            .await
    }

    /// Delete a comment. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
