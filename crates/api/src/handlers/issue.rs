//! Handlers for issues: project-scoped CRUD and the global listing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use softdesk_core::authz::Action;
use softdesk_core::choices::{
    validate_choice, validate_optional_choice, ISSUE_PRIORITIES, ISSUE_STATUSES, ISSUE_TAGS,
    STATUS_TODO,
};
use softdesk_core::error::CoreError;
use softdesk_core::types::DbId;
use softdesk_core::visibility;
use softdesk_db::models::issue::{IssueWithMeta, NewIssue, UpdateIssue};
use softdesk_db::repositories::{ContributorRepo, IssueRepo};

use crate::access;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /projects/{id}/issues`.
///
/// The owning project comes from the URL; a `project` field in the body is
/// accepted only when it matches, otherwise it is a hard validation error.
#[derive(Debug, Deserialize)]
pub struct CreateIssueRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub project: Option<DbId>,
}

/// Request body for `PUT /projects/{project_id}/issues/{issue_id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateIssueRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub tag: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub project: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Project-scoped handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/issues
///
/// Staff or project contributors.
pub async fn list_for_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<IssueWithMeta>>> {
    let principal = auth_user.principal();
    let project = access::load_project(&state.pool, &principal, project_id).await?;
    access::authorize(&principal, Action::Retrieve, &project.project_ctx())?;

    let issues = IssueRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(issues))
}

/// POST /api/v1/projects/{id}/issues
///
/// Staff or project contributors. The author-is-contributor invariant is
/// re-checked inside the write transaction.
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateIssueRequest>,
) -> AppResult<(StatusCode, Json<IssueWithMeta>)> {
    let principal = auth_user.principal();
    let project = access::load_project(&state.pool, &principal, project_id).await?;
    access::authorize(&principal, Action::CreateIssue, &project.project_ctx())?;

    // The parent is navigation context; a conflicting body value is an
    // error, never a silent override.
    if let Some(body_project) = input.project {
        if body_project != project_id {
            return Err(AppError::Core(CoreError::field(
                "project",
                "The project in the body does not match the URL project.",
            )));
        }
    }

    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::field("title", "Title is required.")));
    }

    let priority = input.priority.unwrap_or_default();
    let tag = input.tag.unwrap_or_default();
    let status = input.status.unwrap_or_else(|| STATUS_TODO.to_string());
    validate_optional_choice(&priority, &ISSUE_PRIORITIES)
        .map_err(|msg| AppError::Core(CoreError::field("priority", msg)))?;
    validate_optional_choice(&tag, &ISSUE_TAGS)
        .map_err(|msg| AppError::Core(CoreError::field("tag", msg)))?;
    validate_choice(&status, &ISSUE_STATUSES)
        .map_err(|msg| AppError::Core(CoreError::field("status", msg)))?;

    let new_issue = NewIssue {
        title: input.title,
        description: input.description.unwrap_or_default(),
        priority,
        tag,
        status,
        project_id,
        author_id: auth_user.user_id,
    };

    // Invariant check and insert share one transaction.
    let mut tx = state.pool.begin().await?;
    let author_is_member =
        ContributorRepo::is_member(&mut *tx, new_issue.author_id, project_id).await?;
    if !author_is_member {
        return Err(AppError::Core(CoreError::field(
            "author",
            "The author must be a contributor of the project.",
        )));
    }
    let issue = IssueRepo::create(&mut *tx, &new_issue).await?;
    tx.commit().await?;

    let meta = IssueRepo::find_meta_by_id(&state.pool, issue.id)
        .await?
        .ok_or_else(|| AppError::InternalError("Created issue vanished".into()))?;

    Ok((StatusCode::CREATED, Json(meta)))
}

/// GET /api/v1/projects/{project_id}/issues/{issue_id}
pub async fn get_in_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((project_id, issue_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<IssueWithMeta>> {
    let principal = auth_user.principal();
    let issue =
        access::load_issue_in_project(&state.pool, &principal, project_id, issue_id).await?;
    access::authorize(&principal, Action::Retrieve, &issue.issue_ctx())?;

    let meta = IssueRepo::find_meta_by_id(&state.pool, issue_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Issue" }))?;
    Ok(Json(meta))
}

/// PUT /api/v1/projects/{project_id}/issues/{issue_id}
///
/// Staff or the issue author. The project/author are immutable; the
/// author-is-contributor invariant is re-checked on every save.
pub async fn update_in_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((project_id, issue_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateIssueRequest>,
) -> AppResult<Json<IssueWithMeta>> {
    let principal = auth_user.principal();
    let issue =
        access::load_issue_in_project(&state.pool, &principal, project_id, issue_id).await?;
    access::authorize(&principal, Action::Update, &issue.issue_ctx())?;

    if let Some(body_project) = input.project {
        if body_project != project_id {
            return Err(AppError::Core(CoreError::field(
                "project",
                "The project in the body does not match the URL project.",
            )));
        }
    }

    if let Some(title) = &input.title {
        if title.trim().is_empty() {
            return Err(AppError::Core(CoreError::field("title", "Title is required.")));
        }
    }
    if let Some(priority) = &input.priority {
        validate_optional_choice(priority, &ISSUE_PRIORITIES)
            .map_err(|msg| AppError::Core(CoreError::field("priority", msg)))?;
    }
    if let Some(tag) = &input.tag {
        validate_optional_choice(tag, &ISSUE_TAGS)
            .map_err(|msg| AppError::Core(CoreError::field("tag", msg)))?;
    }
    if let Some(status) = &input.status {
        validate_choice(status, &ISSUE_STATUSES)
            .map_err(|msg| AppError::Core(CoreError::field("status", msg)))?;
    }

    let update = UpdateIssue {
        title: input.title,
        description: input.description,
        priority: input.priority,
        tag: input.tag,
        status: input.status,
    };

    let mut tx = state.pool.begin().await?;
    let author_is_member =
        ContributorRepo::is_member(&mut *tx, issue.issue.author_id, project_id).await?;
    if !author_is_member {
        return Err(AppError::Core(CoreError::field(
            "author",
            "The author must be a contributor of the project.",
        )));
    }
    IssueRepo::update(&mut *tx, issue_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Issue" }))?;
    tx.commit().await?;

    let meta = IssueRepo::find_meta_by_id(&state.pool, issue_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Issue" }))?;
    Ok(Json(meta))
}

/// DELETE /api/v1/projects/{project_id}/issues/{issue_id}
///
/// Staff or the issue author. Assignee links and comments cascade.
pub async fn delete_in_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((project_id, issue_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let principal = auth_user.principal();
    let issue =
        access::load_issue_in_project(&state.pool, &principal, project_id, issue_id).await?;
    access::authorize(&principal, Action::Delete, &issue.issue_ctx())?;

    let deleted = IssueRepo::delete(&state.pool, issue_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Issue" }))
    }
}

// ---------------------------------------------------------------------------
// Global listing
// ---------------------------------------------------------------------------

/// GET /api/v1/issues
///
/// Visibility-scoped listing across projects: staff see all, others see
/// issues of projects they authored or belong to.
pub async fn list_global(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<Vec<IssueWithMeta>>> {
    let scope = visibility::scope(&auth_user.principal());
    let issues = IssueRepo::list_visible(&state.pool, &scope).await?;
    Ok(Json(issues))
}
