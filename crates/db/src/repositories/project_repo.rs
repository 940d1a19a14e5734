//! Repository for the `projects` table.

use sqlx::PgPool;

use softdesk_core::types::DbId;
use softdesk_core::visibility::Visibility;

use crate::models::project::{NewProject, Project, ProjectWithMeta, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, project_type, author_id, created_at, updated_at";

/// Projection for [`ProjectWithMeta`]: author join plus scalar-subquery
/// counts. `contributors_count` excludes the owner's ledger row.
const META_COLUMNS: &str = "p.id, p.name, p.description, p.project_type, p.author_id, \
     u.username AS author_username, \
     (SELECT COUNT(*) FROM contributors c \
        WHERE c.project_id = p.id AND c.user_id <> p.author_id) AS contributors_count, \
     (SELECT COUNT(*) FROM issues i WHERE i.project_id = p.id) AS issues_count, \
     p.created_at, p.updated_at";

/// Visibility filter for non-staff principals: authored projects plus an
/// existence semi-join against the membership ledger. Never a to-many join,
/// so the count annotations above are not distorted.
const VISIBLE_FILTER: &str = "(p.author_id = $1 OR EXISTS (SELECT 1 FROM contributors c \
        WHERE c.project_id = p.id AND c.user_id = $1))";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project and its author's contributor row in one
    /// transaction, so the owner-is-always-a-member invariant holds the
    /// instant the project exists.
    pub async fn create_with_owner(
        pool: &PgPool,
        input: &NewProject,
        author_id: DbId,
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (name, description, project_type, author_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.project_type)
            .bind(author_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO contributors (project_id, user_id, added_by_id)
             VALUES ($1, $2, $2)",
        )
        .bind(project.id)
        .bind(author_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(project)
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project with author and count annotations.
    pub async fn find_meta_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectWithMeta>, sqlx::Error> {
        let query = format!(
            "SELECT {META_COLUMNS} FROM projects p
             JOIN users u ON u.id = p.author_id
             WHERE p.id = $1"
        );
        sqlx::query_as::<_, ProjectWithMeta>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the projects inside the given visibility scope, most recently
    /// updated first.
    pub async fn list_visible(
        pool: &PgPool,
        scope: &Visibility,
    ) -> Result<Vec<ProjectWithMeta>, sqlx::Error> {
        match scope {
            Visibility::All => {
                let query = format!(
                    "SELECT {META_COLUMNS} FROM projects p
                     JOIN users u ON u.id = p.author_id
                     ORDER BY p.updated_at DESC"
                );
                sqlx::query_as::<_, ProjectWithMeta>(&query)
                    .fetch_all(pool)
                    .await
            }
            Visibility::MemberOrAuthor(user_id) => {
                let query = format!(
                    "SELECT {META_COLUMNS} FROM projects p
                     JOIN users u ON u.id = p.author_id
                     WHERE {VISIBLE_FILTER}
                     ORDER BY p.updated_at DESC"
                );
                sqlx::query_as::<_, ProjectWithMeta>(&query)
                    .bind(*user_id)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                project_type = COALESCE($4, project_type),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.project_type)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project. Issues, memberships, and their descendants cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
