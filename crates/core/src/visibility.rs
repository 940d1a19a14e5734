//! Visibility scoping.
//!
//! Decides which resources a principal may see at all. Listing endpoints
//! and detail lookups must agree, so both sides consume the same policy:
//! the pure predicate here, and its SQL translation in the repository
//! layer (an `EXISTS` semi-join, never a to-many join that would multiply
//! rows under count aggregates).
//!
//! The 404-vs-403 contract hangs off this module: a target outside the
//! visible set is reported as absent (404), while a visible target with a
//! denied action is a 403 from [`crate::authz`].

use crate::authz::{AccessContext, Principal};
use crate::types::DbId;

/// Collection-level scope for a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// No filter: the principal sees every row.
    All,
    /// Rows whose owning project the user authored or belongs to.
    MemberOrAuthor(DbId),
}

/// Scope for project and issue collections.
///
/// Comments and assignees have no independent rule: their collections are
/// always reached through a parent issue that was itself visibility
/// checked, so the project predicate covers them transitively.
pub fn scope(principal: &Principal) -> Visibility {
    if principal.is_staff {
        Visibility::All
    } else {
        Visibility::MemberOrAuthor(principal.id)
    }
}

/// Object-level visibility: may the principal see this target at all?
///
/// Mirrors [`scope`] exactly so a resource appears in a listing if and
/// only if retrieving it by id succeeds.
pub fn is_visible(principal: &Principal, ctx: &AccessContext) -> bool {
    principal.is_staff || ctx.is_contributor || principal.id == ctx.project_author_id
}
