//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create/update DTOs for inserts and patches
//! - Joined row structs for API output (counts computed via scalar
//!   subqueries, never to-many joins)

pub mod comment;
pub mod issue;
pub mod membership;
pub mod project;
pub mod session;
pub mod user;
