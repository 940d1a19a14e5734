//! SoftDesk Support domain core.
//!
//! Pure, storage-agnostic logic shared by the persistence and API layers:
//! the authorization engine, visibility scoping, membership-ledger rules,
//! and cross-field validators. Nothing in this crate performs I/O.

pub mod authz;
pub mod choices;
pub mod error;
pub mod membership;
pub mod types;
pub mod validators;
pub mod visibility;
