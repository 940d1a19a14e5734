//! Staff gating extractor.
//!
//! Wraps [`AuthUser`] and rejects requests whose principal does not carry
//! the staff flag. Use in route handlers to enforce the gate at the type
//! level. Object-level decisions stay in `softdesk_core::authz`; this
//! extractor only guards endpoints that have no object to resolve
//! (admin user management).

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use softdesk_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the staff flag. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn staff_only(RequireStaff(user): RequireStaff) -> AppResult<Json<()>> {
///     // user is guaranteed to be staff here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_staff {
            return Err(AppError::Core(CoreError::Forbidden(
                "Staff role required".into(),
            )));
        }
        Ok(RequireStaff(user))
    }
}
