//! Route definitions for `/users/me` and `/admin/users`.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at the `/api/v1` root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users/me",
            get(users::me).patch(users::update_me).delete(users::delete_me),
        )
        .route("/admin/users", get(users::list_users))
        .route(
            "/admin/users/{id}",
            get(users::get_user).delete(users::delete_user),
        )
}
