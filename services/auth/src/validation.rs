//! Input validation utilities

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Trim and lowercase an email so lookups are case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email regex is valid")
    });

    if !regex.is_match(email) {
        return Err("Invalid email address".to_string());
    }

    Ok(())
}

/// Validate a new password
pub fn validate_password(password: &str) -> Result<(), String> {
    let length = password.chars().count();

    if length < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }

    if length > 128 {
        return Err("Password must be at most 128 characters".to_string());
    }

    Ok(())
}

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().chars().count() < 2 {
        return Err("Name must be at least 2 characters".to_string());
    }

    Ok(())
}

/// Validate the text fields of a key code and its validity window
pub fn validate_key_code(
    code: &str,
    description: &str,
    valid_from: Option<DateTime<Utc>>,
    valid_to: Option<DateTime<Utc>>,
) -> Result<(), String> {
    if code.trim().is_empty() {
        return Err("Code is required".to_string());
    }

    if description.trim().is_empty() {
        return Err("Description is required".to_string());
    }

    if let (Some(from), Some(to)) = (valid_from, valid_to) {
        if from > to {
            return Err("validFrom must not be after validTo".to_string());
        }
    }

    Ok(())
}

/// Validate an apartment's name, address and coordinates
pub fn validate_apartment(
    name: &str,
    address: &str,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if address.trim().is_empty() {
        return Err("Address is required".to_string());
    }

    if latitude.is_some_and(|latitude| !(-90.0..=90.0).contains(&latitude)) {
        return Err("latitude must be between -90 and 90".to_string());
    }

    if longitude.is_some_and(|longitude| !(-180.0..=180.0).contains(&longitude)) {
        return Err("longitude must be between -180 and 180".to_string());
    }

    Ok(())
}

/// Validate a stay window
pub fn validate_stay_window(
    check_in: DateTime<Utc>,
    check_out: Option<DateTime<Utc>>,
) -> Result<(), String> {
    if check_out.is_some_and(|check_out| check_out < check_in) {
        return Err("checkOut must not be before checkIn".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn normalizes_email() {
        assert_eq!(normalize_email("  Guest@Example.COM "), "guest@example.com");
    }

    #[test]
    fn email_format() {
        assert!(validate_email("guest@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("guest").is_err());
        assert!(validate_email("guest@example").is_err());
    }

    #[test]
    fn password_length() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("1234567").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn name_length() {
        assert!(validate_name("Al").is_ok());
        assert!(validate_name(" A ").is_err());
    }

    #[test]
    fn key_code_window_must_be_ordered() {
        let now = Utc::now();
        assert!(validate_key_code("1234", "Front door", Some(now), Some(now)).is_ok());
        assert!(validate_key_code("1234", "Front door", None, Some(now)).is_ok());
        assert!(
            validate_key_code("1234", "Front door", Some(now), Some(now - Duration::days(1)))
                .is_err()
        );
        assert!(validate_key_code(" ", "Front door", None, None).is_err());
        assert!(validate_key_code("1234", "", None, None).is_err());
    }

    #[test]
    fn apartment_fields_and_coordinates() {
        assert!(validate_apartment("Loft", "1 Quay Street", Some(59.91), Some(10.75)).is_ok());
        assert!(validate_apartment("Loft", "1 Quay Street", None, None).is_ok());
        assert!(validate_apartment(" ", "1 Quay Street", None, None).is_err());
        assert!(validate_apartment("Loft", "", None, None).is_err());
        assert!(validate_apartment("Loft", "1 Quay Street", Some(91.0), None).is_err());
        assert!(validate_apartment("Loft", "1 Quay Street", None, Some(-180.5)).is_err());
        assert!(validate_apartment("Loft", "1 Quay Street", Some(f64::NAN), None).is_err());
    }

    #[test]
    fn stay_check_out_not_before_check_in() {
        let now = Utc::now();
        assert!(validate_stay_window(now, None).is_ok());
        assert!(validate_stay_window(now, Some(now)).is_ok());
        assert!(validate_stay_window(now, Some(now - Duration::hours(1))).is_err());
    }
}
