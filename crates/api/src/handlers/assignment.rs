//! Handlers for `/issues/{id}/assignees`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use softdesk_core::authz::Action;
use softdesk_core::error::CoreError;
use softdesk_core::types::DbId;
use softdesk_db::models::issue::AssigneeRow;
use softdesk_db::repositories::{AssignmentRepo, ContributorRepo, UserRepo};

use crate::access;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /issues/{id}/assignees`.
#[derive(Debug, Deserialize)]
pub struct AddAssigneeRequest {
    pub user_id: DbId,
}

/// GET /api/v1/issues/{id}/assignees
///
/// Staff or project contributors.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(issue_id): Path<DbId>,
) -> AppResult<Json<Vec<AssigneeRow>>> {
    let principal = auth_user.principal();
    let issue = access::load_issue(&state.pool, &principal, issue_id).await?;
    access::authorize(&principal, Action::ListAssignees, &issue.assignment_ctx())?;

    let rows = AssignmentRepo::list_for_issue(&state.pool, issue_id).await?;
    Ok(Json(rows))
}

/// POST /api/v1/issues/{id}/assignees
///
/// Staff or the issue author. The target must be a contributor of the
/// issue's project at assignment time; a later removal does not
/// retroactively invalidate the assignment.
pub async fn add(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(issue_id): Path<DbId>,
    Json(input): Json<AddAssigneeRequest>,
) -> AppResult<(StatusCode, Json<AssigneeRow>)> {
    let principal = auth_user.principal();
    let issue = access::load_issue(&state.pool, &principal, issue_id).await?;
    access::authorize(&principal, Action::AddAssignee, &issue.assignment_ctx())?;

    let target = UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User" }))?;

    let target_is_member =
        ContributorRepo::is_member(&state.pool, target.id, issue.project.id).await?;
    if !target_is_member {
        return Err(AppError::Core(CoreError::field(
            "user",
            "The assignee must be a contributor of the project.",
        )));
    }

    AssignmentRepo::add(&state.pool, issue_id, target.id, auth_user.user_id)
        .await
        .map_err(|err| match softdesk_db::unique_violation(&err).as_deref() {
            Some("uq_issue_assignees_issue_user") => AppError::Core(CoreError::field(
                "user",
                "This user is already assigned to this issue.",
            )),
            _ => AppError::Database(err),
        })?;

    let row = AssignmentRepo::find_row(&state.pool, issue_id, target.id)
        .await?
        .ok_or_else(|| AppError::InternalError("Created assignment vanished".into()))?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /api/v1/issues/{id}/assignees/{user_id}
///
/// Staff or the issue author.
pub async fn remove(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((issue_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let principal = auth_user.principal();
    let issue = access::load_issue(&state.pool, &principal, issue_id).await?;
    access::authorize(&principal, Action::RemoveAssignee, &issue.assignment_ctx())?;

    let removed = AssignmentRepo::remove(&state.pool, issue_id, user_id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Assignee" }))
    }
}
