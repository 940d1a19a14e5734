//! Comment entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use softdesk_core::types::{DbId, Timestamp};

/// A comment row from the `comments` table. UUID-keyed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: Uuid,
    pub description: String,
    pub issue_id: DbId,
    pub author_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Comment row joined with its author, for API output.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentRow {
    pub id: Uuid,
    pub description: String,
    pub issue_id: DbId,
    pub author_id: DbId,
    pub author_username: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a comment. Issue and author come from the URL context
/// and the authenticated principal.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub description: String,
    pub issue_id: DbId,
    pub author_id: DbId,
}
