//! Handlers for `/projects/{id}/contributors` -- the membership ledger.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use softdesk_core::authz::Action;
use softdesk_core::error::CoreError;
use softdesk_core::membership::{ensure_removable, ContributorLookup};
use softdesk_core::types::DbId;
use softdesk_db::models::membership::ContributorRow;
use softdesk_db::repositories::{ContributorRepo, UserRepo};

use crate::access;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/contributors`.
///
/// Exactly one of the two lookup keys must be provided.
#[derive(Debug, Deserialize)]
pub struct AddContributorRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// GET /api/v1/projects/{id}/contributors
///
/// Staff or project contributors. The owner's ledger row is hidden from
/// the listing.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<ContributorRow>>> {
    let principal = auth_user.principal();
    let project = access::load_project(&state.pool, &principal, project_id).await?;
    access::authorize(&principal, Action::ListContributors, &project.membership_ctx())?;

    let rows = ContributorRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(rows))
}

/// POST /api/v1/projects/{id}/contributors
///
/// Staff or project author. The target user is resolved via exactly one of
/// username/email; an unmatched key is a 404 (distinct from the validation
/// errors), and a duplicate is an "already a contributor" field error
/// backed by the unique constraint, not a check-then-insert.
pub async fn add(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<AddContributorRequest>,
) -> AppResult<(StatusCode, Json<ContributorRow>)> {
    let principal = auth_user.principal();
    let project = access::load_project(&state.pool, &principal, project_id).await?;
    access::authorize(&principal, Action::AddContributor, &project.membership_ctx())?;

    // Resolve the lookup key (exactly one of username/email).
    let lookup = ContributorLookup::from_parts(input.username, input.email)?;
    let target = match &lookup {
        ContributorLookup::Username(username) => {
            UserRepo::find_by_username(&state.pool, username).await?
        }
        ContributorLookup::Email(email) => UserRepo::find_by_email(&state.pool, email).await?,
    }
    .ok_or(AppError::Core(CoreError::NotFound { entity: "User" }))?;

    ContributorRepo::add(&state.pool, project_id, target.id, auth_user.user_id)
        .await
        .map_err(|err| match softdesk_db::unique_violation(&err).as_deref() {
            Some("uq_contributors_project_user") => AppError::Core(CoreError::field(
                "user",
                "This user is already a contributor of this project.",
            )),
            _ => AppError::Database(err),
        })?;

    let row = ContributorRepo::find_row(&state.pool, project_id, target.id)
        .await?
        .ok_or_else(|| AppError::InternalError("Created membership vanished".into()))?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /api/v1/projects/{id}/contributors/{user_id}
///
/// Staff or project author. The author's own row is never removable.
pub async fn remove(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((project_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let principal = auth_user.principal();
    let project = access::load_project(&state.pool, &principal, project_id).await?;
    access::authorize(&principal, Action::RemoveContributor, &project.membership_ctx())?;

    ensure_removable(project.project.author_id, user_id)?;

    let removed = ContributorRepo::remove(&state.pool, project_id, user_id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Contributor" }))
    }
}
