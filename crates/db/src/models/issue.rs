//! Issue entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use softdesk_core::types::{DbId, Timestamp};

/// An issue row from the `issues` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Issue {
    pub id: DbId,
    pub title: String,
    pub description: String,
    /// One of LOW/MEDIUM/HIGH, or empty when unset.
    pub priority: String,
    /// One of BUG/FEATURE/TASK, or empty when unset.
    pub tag: String,
    /// One of TODO/IN_PROGRESS/COMPLETED. No transition ordering enforced.
    pub status: String,
    pub project_id: DbId,
    pub author_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Issue row joined with its author and count annotations.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IssueWithMeta {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub tag: String,
    pub status: String,
    pub project_id: DbId,
    pub author_id: DbId,
    pub author_username: String,
    pub assignees_count: i64,
    pub comments_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new issue. Project and author come from the URL
/// context and the authenticated principal, never from the payload.
#[derive(Debug, Clone)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub tag: String,
    pub status: String,
    pub project_id: DbId,
    pub author_id: DbId,
}

/// DTO for updating an issue. Only non-`None` fields are applied; the
/// project and author are immutable post-creation.
#[derive(Debug, Clone, Default)]
pub struct UpdateIssue {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub tag: Option<String>,
    pub status: Option<String>,
}

/// An assignee link row from the `issue_assignees` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IssueAssignee {
    pub id: DbId,
    pub issue_id: DbId,
    pub user_id: DbId,
    pub assigned_by_id: Option<DbId>,
    pub assigned_at: Timestamp,
}

/// Assignee link joined with user identity and provenance, for API output.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssigneeRow {
    pub user_id: DbId,
    pub username: String,
    pub email: String,
    pub assigned_by: Option<String>,
    pub assigned_at: Timestamp,
}
