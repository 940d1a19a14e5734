//! Handlers for `/issues/{issue_id}/comments`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use softdesk_core::authz::Action;
use softdesk_core::error::CoreError;
use softdesk_core::types::DbId;
use softdesk_db::models::comment::{CommentRow, NewComment};
use softdesk_db::repositories::{CommentRepo, ContributorRepo};

use crate::access;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /issues/{issue_id}/comments`.
///
/// The owning issue comes from the URL; a conflicting `issue` field in the
/// body is a hard validation error.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub description: String,
    #[serde(default)]
    pub issue: Option<DbId>,
}

/// Request body for `PUT /issues/{issue_id}/comments/{comment_id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub description: String,
}

/// GET /api/v1/issues/{issue_id}/comments
///
/// Staff or project contributors, in conversation order.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(issue_id): Path<DbId>,
) -> AppResult<Json<Vec<CommentRow>>> {
    let principal = auth_user.principal();
    let issue = access::load_issue(&state.pool, &principal, issue_id).await?;
    access::authorize(&principal, Action::Retrieve, &issue.issue_ctx())?;

    let rows = CommentRepo::list_for_issue(&state.pool, issue_id).await?;
    Ok(Json(rows))
}

/// POST /api/v1/issues/{issue_id}/comments
///
/// Staff or project contributors. The author-is-contributor invariant is
/// re-checked inside the write transaction.
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(issue_id): Path<DbId>,
    Json(input): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<CommentRow>)> {
    let principal = auth_user.principal();
    let issue = access::load_issue(&state.pool, &principal, issue_id).await?;
    access::authorize(&principal, Action::CreateComment, &issue.issue_ctx())?;

    if let Some(body_issue) = input.issue {
        if body_issue != issue_id {
            return Err(AppError::Core(CoreError::field(
                "issue",
                "The issue in the body does not match the URL issue.",
            )));
        }
    }

    if input.description.trim().is_empty() {
        return Err(AppError::Core(CoreError::field(
            "description",
            "Description is required.",
        )));
    }

    let new_comment = NewComment {
        description: input.description,
        issue_id,
        author_id: auth_user.user_id,
    };

    // Invariant check and insert share one transaction.
    let mut tx = state.pool.begin().await?;
    let author_is_member =
        ContributorRepo::is_member(&mut *tx, new_comment.author_id, issue.project.id).await?;
    if !author_is_member {
        return Err(AppError::Core(CoreError::field(
            "author",
            "The author must be a contributor of the project.",
        )));
    }
    let comment = CommentRepo::create(&mut *tx, &new_comment).await?;
    tx.commit().await?;

    let row = CommentRepo::find_row_by_id(&state.pool, comment.id)
        .await?
        .ok_or_else(|| AppError::InternalError("Created comment vanished".into()))?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/issues/{issue_id}/comments/{comment_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((issue_id, comment_id)): Path<(DbId, Uuid)>,
) -> AppResult<Json<CommentRow>> {
    let principal = auth_user.principal();
    let comment = access::load_comment(&state.pool, &principal, issue_id, comment_id).await?;
    access::authorize(&principal, Action::Retrieve, &comment.comment_ctx())?;

    let row = CommentRepo::find_row_by_id(&state.pool, comment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Comment" }))?;
    Ok(Json(row))
}

/// PUT /api/v1/issues/{issue_id}/comments/{comment_id}
///
/// Staff or the comment author. The author-is-contributor invariant is
/// re-checked on every save.
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((issue_id, comment_id)): Path<(DbId, Uuid)>,
    Json(input): Json<UpdateCommentRequest>,
) -> AppResult<Json<CommentRow>> {
    let principal = auth_user.principal();
    let comment = access::load_comment(&state.pool, &principal, issue_id, comment_id).await?;
    access::authorize(&principal, Action::Update, &comment.comment_ctx())?;

    if input.description.trim().is_empty() {
        return Err(AppError::Core(CoreError::field(
            "description",
            "Description is required.",
        )));
    }

    let mut tx = state.pool.begin().await?;
    let author_is_member =
        ContributorRepo::is_member(&mut *tx, comment.comment.author_id, comment.project.id)
            .await?;
    if !author_is_member {
        return Err(AppError::Core(CoreError::field(
            "author",
            "The author must be a contributor of the project.",
        )));
    }
    CommentRepo::update(&mut *tx, comment_id, &input.description)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Comment" }))?;
    tx.commit().await?;

    let row = CommentRepo::find_row_by_id(&state.pool, comment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Comment" }))?;
    Ok(Json(row))
}

/// DELETE /api/v1/issues/{issue_id}/comments/{comment_id}
///
/// Staff or the comment author.
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((issue_id, comment_id)): Path<(DbId, Uuid)>,
) -> AppResult<StatusCode> {
    let principal = auth_user.principal();
    let comment = access::load_comment(&state.pool, &principal, issue_id, comment_id).await?;
    access::authorize(&principal, Action::Delete, &comment.comment_ctx())?;

    let deleted = CommentRepo::delete(&state.pool, comment_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Comment" }))
    }
}
