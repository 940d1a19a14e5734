//! Handlers for `/users/me` (account self-management) and `/admin/users`
//! (staff user management).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use softdesk_core::error::CoreError;
use softdesk_core::types::DbId;
use softdesk_core::validators::validate_birth_date;
use softdesk_db::models::user::{ProfileUpdate, UserResponse};
use softdesk_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PATCH /users/me`. All fields optional; a provided
/// birth_date must still satisfy the age rule.
#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub can_be_contacted: Option<bool>,
    pub can_data_be_shared: Option<bool>,
}

/// Query parameters for `DELETE /users/me`.
#[derive(Debug, Deserialize)]
pub struct DeleteConfirm {
    pub confirm: Option<String>,
}

// ---------------------------------------------------------------------------
// /users/me
// ---------------------------------------------------------------------------

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User" }))?;
    Ok(Json(user.into()))
}

/// PATCH /api/v1/users/me
///
/// Update profile fields and consent flags. birth_date is optional here but
/// validated at both boundaries when provided.
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<UpdateMeRequest>,
) -> AppResult<Json<UserResponse>> {
    if let Some(birth_date) = input.birth_date {
        validate_birth_date(birth_date)
            .map_err(|msg| AppError::Core(CoreError::field("birth_date", msg)))?;
    }

    let update = ProfileUpdate::new(
        input.username,
        input.email,
        input.first_name,
        input.last_name,
        input.birth_date,
        input.can_be_contacted,
        input.can_data_be_shared,
    )?;

    let user = UserRepo::update_profile(&state.pool, auth_user.user_id, &update)
        .await
        .map_err(classify_profile_conflict)?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User" }))?;

    Ok(Json(user.into()))
}

/// DELETE /api/v1/users/me?confirm=true
///
/// Hard-delete the authenticated user's account. Requires `?confirm=true`
/// to prevent accidental deletions. Authored rows cascade.
pub async fn delete_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<DeleteConfirm>,
) -> AppResult<StatusCode> {
    if params.confirm.as_deref() != Some("true") {
        return Err(AppError::Core(CoreError::field(
            "confirm",
            "Confirmation required: add ?confirm=true",
        )));
    }

    let deleted = UserRepo::delete(&state.pool, auth_user.user_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User" }))
    }
}

// ---------------------------------------------------------------------------
// /admin/users (staff only)
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User" }))?;
    Ok(Json(user.into()))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Staff hard-delete of any account. Authored rows cascade.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = UserRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User" }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map username/email uniqueness violations to field-level 400s.
fn classify_profile_conflict(err: sqlx::Error) -> AppError {
    match softdesk_db::unique_violation(&err).as_deref() {
        Some("uq_users_username") => {
            AppError::Core(CoreError::field("username", "This username is already taken."))
        }
        Some("uq_users_email") => {
            AppError::Core(CoreError::field("email", "This email is already registered."))
        }
        _ => AppError::Database(err),
    }
}
