//! Repository for the `issue_assignees` table.

use sqlx::PgPool;

use softdesk_core::types::DbId;

use crate::models::issue::{AssigneeRow, IssueAssignee};

const COLUMNS: &str = "id, issue_id, user_id, assigned_by_id, assigned_at";

/// Joined projection: assignee identity plus who assigned them.
const ROW_COLUMNS: &str =
    "ia.user_id, u.username, u.email, a.username AS assigned_by, ia.assigned_at";

/// Provides assignment operations for issues.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// List an issue's assignees ordered by username.
    pub async fn list_for_issue(
        pool: &PgPool,
        issue_id: DbId,
    ) -> Result<Vec<AssigneeRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ROW_COLUMNS} FROM issue_assignees ia
             JOIN users u ON u.id = ia.user_id
             LEFT JOIN users a ON a.id = ia.assigned_by_id
             WHERE ia.issue_id = $1
             ORDER BY u.username ASC"
        );
        sqlx::query_as::<_, AssigneeRow>(&query)
            .bind(issue_id)
            .fetch_all(pool)
            .await
    }

    /// Insert an assignee link recording who performed the assignment.
    ///
    /// A duplicate surfaces as a unique-constraint violation on
    /// `uq_issue_assignees_issue_user` for the caller to classify.
    pub async fn add(
        pool: &PgPool,
        issue_id: DbId,
        user_id: DbId,
        assigned_by_id: DbId,
    ) -> Result<IssueAssignee, sqlx::Error> {
        let query = format!(
            "INSERT INTO issue_assignees (issue_id, user_id, assigned_by_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IssueAssignee>(&query)
            .bind(issue_id)
            .bind(user_id)
            .bind(assigned_by_id)
            .fetch_one(pool)
            .await
    }

    /// Fetch one assignee link in the joined API shape.
    pub async fn find_row(
        pool: &PgPool,
        issue_id: DbId,
        user_id: DbId,
    ) -> Result<Option<AssigneeRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ROW_COLUMNS} FROM issue_assignees ia
             JOIN users u ON u.id = ia.user_id
             LEFT JOIN users a ON a.id = ia.assigned_by_id
             WHERE ia.issue_id = $1 AND ia.user_id = $2"
        );
        sqlx::query_as::<_, AssigneeRow>(&query)
            .bind(issue_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Remove an assignee link. Returns `true` if a row was removed.
    pub async fn remove(
        pool: &PgPool,
        issue_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM issue_assignees WHERE issue_id = $1 AND user_id = $2",
        )
        .bind(issue_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
