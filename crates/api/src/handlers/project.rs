//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use softdesk_core::authz::Action;
use softdesk_core::choices::{validate_choice, PROJECT_TYPES};
use softdesk_core::error::CoreError;
use softdesk_core::types::DbId;
use softdesk_core::visibility;
use softdesk_db::models::membership::ContributorRow;
use softdesk_db::models::project::{NewProject, ProjectWithMeta, UpdateProject};
use softdesk_db::repositories::{ContributorRepo, ProjectRepo};

use crate::access;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /projects`.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub project_type: String,
}

/// Request body for `PUT /projects/{id}`. Only provided fields change.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub project_type: Option<String>,
}

/// Detail response: project meta plus the contributor listing (owner hidden).
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: ProjectWithMeta,
    pub contributors: Vec<ContributorRow>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/projects
///
/// Any authenticated user may create a project. The creator becomes author
/// and contributor in the same transaction.
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<ProjectWithMeta>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::field("name", "Name is required.")));
    }
    validate_choice(&input.project_type, &PROJECT_TYPES)
        .map_err(|msg| AppError::Core(CoreError::field("project_type", msg)))?;

    let new_project = NewProject {
        name: input.name,
        description: input.description.unwrap_or_default(),
        project_type: input.project_type,
    };

    let project =
        ProjectRepo::create_with_owner(&state.pool, &new_project, auth_user.user_id).await?;

    let meta = ProjectRepo::find_meta_by_id(&state.pool, project.id)
        .await?
        .ok_or_else(|| AppError::InternalError("Created project vanished".into()))?;

    Ok((StatusCode::CREATED, Json(meta)))
}

/// GET /api/v1/projects
///
/// Visibility-scoped listing: staff see all, others see projects they
/// authored or belong to.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<Vec<ProjectWithMeta>>> {
    let scope = visibility::scope(&auth_user.principal());
    let projects = ProjectRepo::list_visible(&state.pool, &scope).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectDetail>> {
    let principal = auth_user.principal();
    let project = access::load_project(&state.pool, &principal, id).await?;
    access::authorize(&principal, Action::Retrieve, &project.project_ctx())?;

    let meta = ProjectRepo::find_meta_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Project" }))?;
    let contributors = ContributorRepo::list_for_project(&state.pool, id).await?;

    Ok(Json(ProjectDetail {
        project: meta,
        contributors,
    }))
}

/// PUT /api/v1/projects/{id}
///
/// Staff or project author only.
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectRequest>,
) -> AppResult<Json<ProjectWithMeta>> {
    let principal = auth_user.principal();
    let project = access::load_project(&state.pool, &principal, id).await?;
    access::authorize(&principal, Action::Update, &project.project_ctx())?;

    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(AppError::Core(CoreError::field("name", "Name is required.")));
        }
    }
    if let Some(project_type) = &input.project_type {
        validate_choice(project_type, &PROJECT_TYPES)
            .map_err(|msg| AppError::Core(CoreError::field("project_type", msg)))?;
    }

    let update = UpdateProject {
        name: input.name,
        description: input.description,
        project_type: input.project_type,
    };

    ProjectRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Project" }))?;

    let meta = ProjectRepo::find_meta_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Project" }))?;

    Ok(Json(meta))
}

/// DELETE /api/v1/projects/{id}
///
/// Staff or project author only. Issues, memberships, and their
/// descendants cascade.
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let principal = auth_user.principal();
    let project = access::load_project(&state.pool, &principal, id).await?;
    access::authorize(&principal, Action::Delete, &project.project_ctx())?;

    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Project" }))
    }
}
