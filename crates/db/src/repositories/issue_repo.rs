//! Repository for the `issues` table.

use sqlx::{PgExecutor, PgPool};

use softdesk_core::types::DbId;
use softdesk_core::visibility::Visibility;

use crate::models::issue::{Issue, IssueWithMeta, NewIssue, UpdateIssue};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, priority, tag, status, project_id, author_id, \
                       created_at, updated_at";

/// Projection for [`IssueWithMeta`]: author join plus scalar-subquery counts.
const META_COLUMNS: &str = "i.id, i.title, i.description, i.priority, i.tag, i.status, \
     i.project_id, i.author_id, u.username AS author_username, \
     (SELECT COUNT(*) FROM issue_assignees ia WHERE ia.issue_id = i.id) AS assignees_count, \
     (SELECT COUNT(*) FROM comments cm WHERE cm.issue_id = i.id) AS comments_count, \
     i.created_at, i.updated_at";

/// Visibility filter for non-staff principals, applied through the owning
/// project: authored-or-member, as an existence semi-join.
const VISIBLE_FILTER: &str = "EXISTS (SELECT 1 FROM projects p \
        WHERE p.id = i.project_id AND (p.author_id = $1 OR EXISTS ( \
            SELECT 1 FROM contributors c WHERE c.project_id = p.id AND c.user_id = $1)))";

/// Provides CRUD operations for issues.
pub struct IssueRepo;

impl IssueRepo {
    /// Insert a new issue.
    ///
    /// Executor-generic so the author-is-contributor invariant check and
    /// this insert can share one transaction.
    pub async fn create<'e, E>(executor: E, input: &NewIssue) -> Result<Issue, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO issues (title, description, priority, tag, status, project_id, author_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Issue>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.priority)
            .bind(&input.tag)
            .bind(&input.status)
            .bind(input.project_id)
            .bind(input.author_id)
            .fetch_one(executor)
            .await
    }

    /// Find an issue by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Issue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM issues WHERE id = $1");
        sqlx::query_as::<_, Issue>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an issue with author and count annotations.
    pub async fn find_meta_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<IssueWithMeta>, sqlx::Error> {
        let query = format!(
            "SELECT {META_COLUMNS} FROM issues i
             JOIN users u ON u.id = i.author_id
             WHERE i.id = $1"
        );
        sqlx::query_as::<_, IssueWithMeta>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's issues, most recently updated first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<IssueWithMeta>, sqlx::Error> {
        let query = format!(
            "SELECT {META_COLUMNS} FROM issues i
             JOIN users u ON u.id = i.author_id
             WHERE i.project_id = $1
             ORDER BY i.updated_at DESC"
        );
        sqlx::query_as::<_, IssueWithMeta>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List the issues inside the given visibility scope, across projects.
    pub async fn list_visible(
        pool: &PgPool,
        scope: &Visibility,
    ) -> Result<Vec<IssueWithMeta>, sqlx::Error> {
        match scope {
            Visibility::All => {
                let query = format!(
                    "SELECT {META_COLUMNS} FROM issues i
                     JOIN users u ON u.id = i.author_id
                     ORDER BY i.updated_at DESC"
                );
                sqlx::query_as::<_, IssueWithMeta>(&query)
                    .fetch_all(pool)
                    .await
            }
            Visibility::MemberOrAuthor(user_id) => {
                let query = format!(
                    "SELECT {META_COLUMNS} FROM issues i
                     JOIN users u ON u.id = i.author_id
                     WHERE {VISIBLE_FILTER}
                     ORDER BY i.updated_at DESC"
                );
                sqlx::query_as::<_, IssueWithMeta>(&query)
                    .bind(*user_id)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Update an issue. Only non-`None` fields in `input` are applied;
    /// project and author never change.
    ///
    /// Executor-generic for the same reason as [`IssueRepo::create`].
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateIssue,
    ) -> Result<Option<Issue>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE issues SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                priority = COALESCE($4, priority),
                tag = COALESCE($5, tag),
                status = COALESCE($6, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Issue>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.priority)
            .bind(&input.tag)
            .bind(&input.status)
            .fetch_optional(executor)
            .await
    }

    /// Delete an issue. Assignee links and comments cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM issues WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
