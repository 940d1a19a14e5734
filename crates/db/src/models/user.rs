//! User entity model and DTOs.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use softdesk_core::error::CoreError;
use softdesk_core::types::{DbId, Timestamp};
use softdesk_core::validators::validate_birth_date;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub birth_date: NaiveDate,
    pub can_be_contacted: bool,
    pub can_data_be_shared: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub birth_date: NaiveDate,
    pub can_be_contacted: bool,
    pub can_data_be_shared: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_staff: user.is_staff,
            birth_date: user.birth_date,
            can_be_contacted: user.can_be_contacted,
            can_data_be_shared: user.can_data_be_shared,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Validated insert payload for the `users` table.
///
/// Constructible only through [`NewUser::new`], which enforces the
/// birth-date rule at the persistence boundary. The API boundary runs the
/// same validator first for friendly field errors; this constructor is the
/// second lock that no code path can skip.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) is_staff: bool,
    pub(crate) birth_date: NaiveDate,
    pub(crate) can_be_contacted: bool,
    pub(crate) can_data_be_shared: bool,
}

impl NewUser {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        is_staff: bool,
        birth_date: NaiveDate,
        can_be_contacted: bool,
        can_data_be_shared: bool,
    ) -> Result<Self, CoreError> {
        validate_birth_date(birth_date).map_err(|msg| CoreError::field("birth_date", msg))?;
        Ok(Self {
            username,
            email,
            password_hash,
            first_name,
            last_name,
            is_staff,
            birth_date,
            can_be_contacted,
            can_data_be_shared,
        })
    }
}

/// Validated partial update for a user's own profile. All fields optional.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub(crate) username: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) first_name: Option<String>,
    pub(crate) last_name: Option<String>,
    pub(crate) birth_date: Option<NaiveDate>,
    pub(crate) can_be_contacted: Option<bool>,
    pub(crate) can_data_be_shared: Option<bool>,
}

impl ProfileUpdate {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        username: Option<String>,
        email: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        birth_date: Option<NaiveDate>,
        can_be_contacted: Option<bool>,
        can_data_be_shared: Option<bool>,
    ) -> Result<Self, CoreError> {
        if let Some(birth_date) = birth_date {
            validate_birth_date(birth_date)
                .map_err(|msg| CoreError::field("birth_date", msg))?;
        }
        Ok(Self {
            username,
            email,
            first_name,
            last_name,
            birth_date,
            can_be_contacted,
            can_data_be_shared,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Datelike, Utc};

    use super::*;

    fn base_new_user(birth_date: NaiveDate) -> Result<NewUser, CoreError> {
        NewUser::new(
            "alice".into(),
            "alice@example.com".into(),
            "$argon2id$fake".into(),
            String::new(),
            String::new(),
            false,
            birth_date,
            false,
            false,
        )
    }

    #[test]
    fn underage_birth_date_is_rejected_at_the_model_boundary() {
        let today = Utc::now().date_naive();
        let ten_years_ago =
            NaiveDate::from_ymd_opt(today.year() - 10, today.month(), 1).unwrap();

        let err = base_new_user(ten_years_ago).unwrap_err();
        assert_matches!(err, CoreError::InvalidFields(fields) => {
            assert!(fields.get("birth_date").is_some());
        });
    }

    #[test]
    fn adult_birth_date_is_accepted() {
        let birth = NaiveDate::from_ymd_opt(1990, 5, 20).unwrap();
        assert!(base_new_user(birth).is_ok());
    }

    #[test]
    fn profile_update_validates_birth_date_only_when_present() {
        assert!(ProfileUpdate::new(None, None, None, None, None, Some(true), None).is_ok());

        let today = Utc::now().date_naive();
        let underage = NaiveDate::from_ymd_opt(today.year() - 3, 1, 1).unwrap();
        assert_matches!(
            ProfileUpdate::new(None, None, None, None, Some(underage), None, None),
            Err(CoreError::InvalidFields(_))
        );
    }
}
