//! Route composition.

pub mod auth;
pub mod health;
pub mod issue;
pub mod project;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                                signup (public)
/// /auth/login                                 login (public)
/// /auth/refresh                               refresh (public)
/// /auth/logout                                logout (requires auth)
///
/// /users/me                                   get, patch, delete own account
/// /admin/users                                list (staff only)
/// /admin/users/{id}                           get, delete (staff only)
///
/// /projects                                   list, create
/// /projects/{id}                              get, update, delete
/// /projects/{id}/contributors                 list, add
/// /projects/{id}/contributors/{user_id}       remove
/// /projects/{project_id}/issues               list, create
/// /projects/{project_id}/issues/{issue_id}    get, update, delete
///
/// /issues                                     global list (scoped)
/// /issues/{id}/assignees                      list, add
/// /issues/{id}/assignees/{user_id}            remove
/// /issues/{issue_id}/comments                 list, create
/// /issues/{issue_id}/comments/{comment_id}    get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(users::router())
        .nest("/projects", project::router())
        .nest("/issues", issue::router())
}
