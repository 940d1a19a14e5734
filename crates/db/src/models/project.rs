//! Project entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use softdesk_core::types::{DbId, Timestamp};

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub project_type: String,
    pub author_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Project row joined with its author and count annotations.
///
/// `contributors_count` excludes the owner row; both counts are scalar
/// subqueries so they stay correct regardless of other joins.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectWithMeta {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub project_type: String,
    pub author_id: DbId,
    pub author_username: String,
    pub contributors_count: i64,
    pub issues_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project. The author comes from the authenticated
/// principal, never from the payload.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub project_type: String,
}

/// DTO for updating a project. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub project_type: Option<String>,
}
