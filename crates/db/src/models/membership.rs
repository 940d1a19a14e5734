//! Contributor (membership ledger) models.

use serde::Serialize;
use sqlx::FromRow;

use softdesk_core::types::{DbId, Timestamp};

/// A membership row from the `contributors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contributor {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    /// The acting principal who created the row; NULL only after that
    /// user's deletion.
    pub added_by_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// Membership row joined with member identity and provenance, for API output.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContributorRow {
    pub membership_id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub email: String,
    pub added_by: Option<String>,
    pub created_at: Timestamp,
}
