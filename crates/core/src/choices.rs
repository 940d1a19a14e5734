//! Well-known TEXT-choice values.
//!
//! These must match the CHECK constraints in the schema migrations.

/// Allowed `projects.project_type` values.
pub const PROJECT_TYPES: [&str; 4] = ["BACK_END", "FRONT_END", "IOS", "ANDROID"];

/// Allowed `issues.priority` values (optional field; empty string allowed).
pub const ISSUE_PRIORITIES: [&str; 3] = ["LOW", "MEDIUM", "HIGH"];

/// Allowed `issues.tag` values (optional field; empty string allowed).
pub const ISSUE_TAGS: [&str; 3] = ["BUG", "FEATURE", "TASK"];

/// Allowed `issues.status` values. Plain data field: any value is settable
/// by a principal with update rights, no transition ordering is enforced.
pub const ISSUE_STATUSES: [&str; 3] = ["TODO", "IN_PROGRESS", "COMPLETED"];

/// Default status for new issues.
pub const STATUS_TODO: &str = "TODO";

/// Validate a required choice field.
pub fn validate_choice(value: &str, allowed: &[&str]) -> Result<(), String> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(format!("Must be one of: {}.", allowed.join(", ")))
    }
}

/// Validate an optional choice field, where the empty string means unset.
pub fn validate_optional_choice(value: &str, allowed: &[&str]) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    validate_choice(value, allowed)
}
