//! Repository for the `contributors` table -- the membership ledger.

use sqlx::{PgExecutor, PgPool};

use softdesk_core::types::DbId;

use crate::models::membership::{Contributor, ContributorRow};

const COLUMNS: &str = "id, project_id, user_id, added_by_id, created_at";

/// Joined projection for API output: member identity plus who added them.
const ROW_COLUMNS: &str = "c.id AS membership_id, c.user_id, u.username, u.email, \
     a.username AS added_by, c.created_at";

/// Provides point lookups, listing, and mutation for project memberships.
pub struct ContributorRepo;

impl ContributorRepo {
    /// Point lookup: does `user_id` hold a membership row for `project_id`?
    ///
    /// Generic over the executor so invariant checks can run inside the
    /// same transaction as the write they guard.
    pub async fn is_member<'e, E>(
        executor: E,
        user_id: DbId,
        project_id: DbId,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM contributors WHERE user_id = $1 AND project_id = $2)",
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    /// List a project's memberships for API output, hiding the owner's row,
    /// ordered by member username.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ContributorRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ROW_COLUMNS} FROM contributors c
             JOIN users u ON u.id = c.user_id
             JOIN projects p ON p.id = c.project_id
             LEFT JOIN users a ON a.id = c.added_by_id
             WHERE c.project_id = $1 AND c.user_id <> p.author_id
             ORDER BY u.username ASC"
        );
        sqlx::query_as::<_, ContributorRow>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a membership row recording who added the member.
    ///
    /// A concurrent duplicate surfaces as a unique-constraint violation on
    /// `uq_contributors_project_user` for the caller to classify; the
    /// constraint, not a check-then-insert, is what guarantees uniqueness.
    pub async fn add(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        added_by_id: DbId,
    ) -> Result<Contributor, sqlx::Error> {
        let query = format!(
            "INSERT INTO contributors (project_id, user_id, added_by_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contributor>(&query)
            .bind(project_id)
            .bind(user_id)
            .bind(added_by_id)
            .fetch_one(pool)
            .await
    }

    /// Fetch one membership in the joined API shape.
    pub async fn find_row(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ContributorRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ROW_COLUMNS} FROM contributors c
             JOIN users u ON u.id = c.user_id
             LEFT JOIN users a ON a.id = c.added_by_id
             WHERE c.project_id = $1 AND c.user_id = $2"
        );
        sqlx::query_as::<_, ContributorRow>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Remove a membership row. Returns `true` if a row was removed.
    ///
    /// Callers must refuse the owner before calling; the ledger itself does
    /// not distinguish the owner's row.
    pub async fn remove(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM contributors WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
