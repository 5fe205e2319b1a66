//! Validation Utilities
//!
//! Conversion from `validator` errors to `AppError`, plus the custom field
//! validators shared by the request DTOs.

use chrono::{Datelike, NaiveDate, Utc};
use validator::{ValidationError, ValidationErrors};

use super::error::{AppError, FieldError};

/// Minimum age required at registration
pub const MIN_AGE_YEARS: i32 = 16;

/// Convert validation errors to AppError
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e.message.clone().map(|m| m.to_string()).unwrap_or_default(),
            })
        })
        .collect();

    let message = field_errors
        .first()
        .map(|e| format!("{}: {}", e.field, e.message))
        .unwrap_or_else(|| "Validation failed".into());

    AppError::Validation {
        message,
        errors: field_errors,
    }
}

/// Password strength rule: at least 8 characters with an uppercase letter,
/// a lowercase letter, a digit, and a special character.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= 8;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if long_enough && has_upper && has_lower && has_digit && has_special {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength").with_message(
            "Password must be at least 8 characters with upper, lower, digit, and special characters".into(),
        ))
    }
}

/// External-link rule: the profile link must point at GitHub.
pub fn validate_github_url(url: &str) -> Result<(), ValidationError> {
    if url.to_lowercase().contains("github.com/") {
        Ok(())
    } else {
        Err(ValidationError::new("github_url")
            .with_message("The URL must be a github.com link".into()))
    }
}

/// Birth date rule: the resulting age must be at least 16 years.
pub fn validate_birth_date(birth_date: &NaiveDate) -> Result<(), ValidationError> {
    if age_in_years(*birth_date, Utc::now().date_naive()) >= MIN_AGE_YEARS {
        Ok(())
    } else {
        Err(ValidationError::new("birth_date")
            .with_message("You must be at least 16 years old".into()))
    }
}

/// Whole years elapsed between `birth_date` and `today`.
fn age_in_years(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_strength_accepts_valid() {
        assert!(validate_password_strength("Sup3r-Secret").is_ok());
        assert!(validate_password_strength("Aa1!aaaa").is_ok());
    }

    #[test]
    fn test_password_strength_rejects_short() {
        assert!(validate_password_strength("Aa1!a").is_err());
    }

    #[test]
    fn test_password_strength_rejects_missing_classes() {
        assert!(validate_password_strength("alllowercase1!").is_err());
        assert!(validate_password_strength("ALLUPPERCASE1!").is_err());
        assert!(validate_password_strength("NoDigitsHere!").is_err());
        assert!(validate_password_strength("NoSpecials123").is_err());
    }

    #[test]
    fn test_github_url() {
        assert!(validate_github_url("https://github.com/someone").is_ok());
        assert!(validate_github_url("https://GitHub.com/Someone").is_ok());
        assert!(validate_github_url("https://gitlab.com/someone").is_err());
    }

    #[test]
    fn test_age_in_years_counts_birthdays() {
        let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();

        let before_birthday = NaiveDate::from_ymd_opt(2016, 6, 14).unwrap();
        assert_eq!(age_in_years(birth, before_birthday), 15);

        let on_birthday = NaiveDate::from_ymd_opt(2016, 6, 15).unwrap();
        assert_eq!(age_in_years(birth, on_birthday), 16);
    }

    #[test]
    fn test_birth_date_rejects_minors() {
        let today = Utc::now().date_naive();
        let too_young = today
            .with_year(today.year() - 10)
            .expect("valid date");

        assert!(validate_birth_date(&too_young).is_err());
    }

    #[test]
    fn test_birth_date_accepts_adults() {
        let today = Utc::now().date_naive();
        let adult = today
            .with_year(today.year() - 30)
            .expect("valid date");

        assert!(validate_birth_date(&adult).is_ok());
    }
}
