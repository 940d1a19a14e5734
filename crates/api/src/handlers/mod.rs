//! HTTP handlers, one module per resource.
//!
//! Handlers are the resource services: they guard access through
//! [`crate::access`], validate input, and run invariant checks inside the
//! same transaction as the write they protect.

pub mod assignment;
pub mod auth;
pub mod comment;
pub mod contributor;
pub mod issue;
pub mod project;
pub mod users;
