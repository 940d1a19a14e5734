//! Route definitions for the `/projects` resource.
//!
//! Also nests contributor and project-scoped issue routes
//! under `/projects/{project_id}/...`.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{contributor, issue, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                    -> list
/// POST   /                                    -> create
/// GET    /{id}                                -> get_by_id
/// PUT    /{id}                                -> update
/// DELETE /{id}                                -> delete
///
/// GET    /{id}/contributors                   -> list
/// POST   /{id}/contributors                   -> add
/// DELETE /{id}/contributors/{user_id}         -> remove
///
/// GET    /{project_id}/issues                 -> list_for_project
/// POST   /{project_id}/issues                 -> create
/// GET    /{project_id}/issues/{issue_id}      -> get_in_project
/// PUT    /{project_id}/issues/{issue_id}      -> update_in_project
/// DELETE /{project_id}/issues/{issue_id}      -> delete_in_project
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route(
            "/{id}/contributors",
            get(contributor::list).post(contributor::add),
        )
        .route(
            "/{id}/contributors/{user_id}",
            delete(contributor::remove),
        )
        .route(
            "/{project_id}/issues",
            get(issue::list_for_project).post(issue::create),
        )
        .route(
            "/{project_id}/issues/{issue_id}",
            get(issue::get_in_project)
                .put(issue::update_in_project)
                .delete(issue::delete_in_project),
        )
}
