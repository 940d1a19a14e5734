//! Membership-ledger rules.
//!
//! Pure validation for contributor management: the lookup key used to add
//! a contributor (exactly one of username/email), and the guard that keeps
//! the project owner's ledger row permanent.

use crate::error::CoreError;
use crate::types::DbId;

/// Resolved lookup key for adding a contributor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContributorLookup {
    Username(String),
    Email(String),
}

impl ContributorLookup {
    /// Build a lookup from optional request fields.
    ///
    /// Exactly one of `username`/`email` must be present and non-blank;
    /// zero or two is a field-level validation error, never a silent pick.
    pub fn from_parts(
        username: Option<String>,
        email: Option<String>,
    ) -> Result<Self, CoreError> {
        let username = username.filter(|v| !v.trim().is_empty());
        let email = email.filter(|v| !v.trim().is_empty());

        match (username, email) {
            (Some(username), None) => Ok(ContributorLookup::Username(username)),
            (None, Some(email)) => Ok(ContributorLookup::Email(email)),
            (Some(_), Some(_)) => Err(CoreError::field(
                "user",
                "Provide exactly one of username or email, not both.",
            )),
            (None, None) => Err(CoreError::field(
                "user",
                "Provide exactly one of username or email.",
            )),
        }
    }
}

/// Refuse removing the project author from the ledger.
///
/// The owner's membership row is created with the project and must never
/// disappear; callers check this before touching storage.
pub fn ensure_removable(project_author_id: DbId, target_user_id: DbId) -> Result<(), CoreError> {
    if target_user_id == project_author_id {
        return Err(CoreError::field(
            "user",
            "The project author cannot be removed from the project.",
        ));
    }
    Ok(())
}
