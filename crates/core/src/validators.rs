//! Cross-field validators shared by the API boundary and the persistence
//! boundary (the double lock on user birth dates).

use chrono::{Datelike, NaiveDate, Utc};

/// Minimum age required to hold an account.
pub const MIN_SIGNUP_AGE_YEARS: i32 = 15;

/// Age in full years at `today`.
pub fn calculate_age(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Enforce the birth-date rules: not in the future, and age >= 15.
///
/// `today` is injected so the rule is deterministic under test; production
/// callers use [`validate_birth_date`].
pub fn validate_birth_date_at(birth_date: NaiveDate, today: NaiveDate) -> Result<(), String> {
    if birth_date > today {
        return Err("Birth date cannot be in the future.".to_string());
    }
    if calculate_age(birth_date, today) < MIN_SIGNUP_AGE_YEARS {
        return Err(format!(
            "You must be at least {MIN_SIGNUP_AGE_YEARS} years old to register."
        ));
    }
    Ok(())
}

/// [`validate_birth_date_at`] against the current UTC date.
pub fn validate_birth_date(birth_date: NaiveDate) -> Result<(), String> {
    validate_birth_date_at(birth_date, Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_counts_full_years_only() {
        let today = date(2026, 6, 15);
        assert_eq!(calculate_age(date(2000, 6, 15), today), 26);
        // Birthday tomorrow: still 25.
        assert_eq!(calculate_age(date(2000, 6, 16), today), 25);
        assert_eq!(calculate_age(date(2000, 12, 31), today), 25);
    }

    #[test]
    fn future_birth_date_rejected() {
        let today = date(2026, 1, 1);
        let err = validate_birth_date_at(date(2026, 1, 2), today).unwrap_err();
        assert!(err.contains("future"));
    }

    #[test]
    fn underage_rejected_with_minimum_named() {
        let today = date(2026, 1, 1);
        let err = validate_birth_date_at(date(2016, 1, 1), today).unwrap_err();
        assert!(err.contains("15"), "message should state the minimum age");
    }

    #[test]
    fn fifteenth_birthday_is_the_boundary() {
        let today = date(2026, 6, 15);
        // Turns 15 today: allowed.
        assert!(validate_birth_date_at(date(2011, 6, 15), today).is_ok());
        // Turns 15 tomorrow: rejected.
        assert!(validate_birth_date_at(date(2011, 6, 16), today).is_err());
    }

    #[test]
    fn adult_birth_date_accepted() {
        let today = date(2026, 1, 1);
        assert!(validate_birth_date_at(date(1990, 5, 20), today).is_ok());
    }
}
