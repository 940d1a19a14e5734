//! Route definitions for the global `/issues` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{assignment, comment, issue};
use crate::state::AppState;

/// Routes mounted at `/issues`.
///
/// ```text
/// GET    /                                    -> list_global
///
/// GET    /{id}/assignees                      -> list
/// POST   /{id}/assignees                      -> add
/// DELETE /{id}/assignees/{user_id}            -> remove
///
/// GET    /{issue_id}/comments                 -> list
/// POST   /{issue_id}/comments                 -> create
/// GET    /{issue_id}/comments/{comment_id}    -> get_by_id
/// PUT    /{issue_id}/comments/{comment_id}    -> update
/// DELETE /{issue_id}/comments/{comment_id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(issue::list_global))
        .route(
            "/{id}/assignees",
            get(assignment::list).post(assignment::add),
        )
        .route("/{id}/assignees/{user_id}", delete(assignment::remove))
        .route(
            "/{issue_id}/comments",
            get(comment::list).post(comment::create),
        )
        .route(
            "/{issue_id}/comments/{comment_id}",
            get(comment::get_by_id)
                .put(comment::update)
                .delete(comment::delete),
        )
}
