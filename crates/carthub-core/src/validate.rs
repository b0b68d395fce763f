// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field and cross-field validation rules.
//!
//! These run at the request boundary before any mutation is attempted.
//! Error messages are the wire-visible text, so they keep the phrasing
//! the admin UI routes into specific form fields.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use crate::error::CarthubError;

static CART_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").unwrap());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[\d\s-]{10,}$").unwrap());

/// Minimum checkout-to-return window.
pub const MIN_RETURN_WINDOW_MINUTES: i64 = 30;
/// Maximum checkout-to-return window.
pub const MAX_RETURN_WINDOW_HOURS: i64 = 24;
/// Upper bound on carts created in one bulk request.
pub const MAX_BULK_COUNT: u32 = 50;
/// Highest first sequence number a bulk request may use. Keeps the final
/// number within the three-digit padding and the arithmetic far from
/// `u32` overflow.
pub const MAX_BULK_START: u32 = 999;

/// A cart number (or bulk prefix) is non-empty alphanumeric-with-dashes.
pub fn validate_cart_number(number: &str) -> Result<(), CarthubError> {
    if number.is_empty() {
        return Err(CarthubError::validation("Cart number is required"));
    }
    if !CART_NUMBER_RE.is_match(number) {
        return Err(CarthubError::validation(
            "Cart number may only contain letters, numbers, and dashes",
        ));
    }
    Ok(())
}

/// Battery level must be an integer in [0, 100]. Out-of-range values are
/// rejected, never clamped.
pub fn validate_battery_level(level: i64) -> Result<(), CarthubError> {
    if !(0..=100).contains(&level) {
        return Err(CarthubError::validation(
            "Battery level must be between 0 and 100",
        ));
    }
    Ok(())
}

/// A user-supplied return-by time must sit strictly after checkout,
/// at least 30 minutes and at most 24 hours later.
pub fn validate_return_window(
    checkout: DateTime<Utc>,
    return_by: DateTime<Utc>,
) -> Result<(), CarthubError> {
    if return_by <= checkout {
        return Err(CarthubError::validation(
            "Return time must be after checkout time",
        ));
    }
    let window = return_by - checkout;
    if window < Duration::minutes(MIN_RETURN_WINDOW_MINUTES) {
        return Err(CarthubError::validation(
            "Return time must be at least 30 minutes after checkout",
        ));
    }
    if window > Duration::hours(MAX_RETURN_WINDOW_HOURS) {
        return Err(CarthubError::validation(
            "Return time cannot be more than 24 hours after checkout",
        ));
    }
    Ok(())
}

/// Person fields: name required, email/phone format-checked when present.
pub fn validate_person(
    name: &str,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<(), CarthubError> {
    if name.trim().is_empty() {
        return Err(CarthubError::validation("Name is required"));
    }
    if let Some(email) = email
        && !email.is_empty()
        && !EMAIL_RE.is_match(email)
    {
        return Err(CarthubError::validation("Invalid email address"));
    }
    if let Some(phone) = phone
        && !phone.is_empty()
        && !PHONE_RE.is_match(phone)
    {
        return Err(CarthubError::validation("Invalid phone number"));
    }
    Ok(())
}

/// Bulk-create prefix, start, and count bounds.
pub fn validate_bulk_request(prefix: &str, start: u32, count: u32) -> Result<(), CarthubError> {
    if prefix.is_empty() {
        return Err(CarthubError::validation("Prefix is required"));
    }
    if !CART_NUMBER_RE.is_match(prefix) {
        return Err(CarthubError::validation(
            "Prefix may only contain letters, numbers, and dashes",
        ));
    }
    if count == 0 || count > MAX_BULK_COUNT {
        return Err(CarthubError::validation(format!(
            "Count must be between 1 and {MAX_BULK_COUNT}"
        )));
    }
    if start == 0 || start > MAX_BULK_START {
        return Err(CarthubError::validation(format!(
            "Start must be between 1 and {MAX_BULK_START}"
        )));
    }
    Ok(())
}

/// Expand a bulk request into concrete cart numbers:
/// `{prefix}-{n}` with n zero-padded to three digits.
pub fn bulk_cart_numbers(prefix: &str, start: u32, count: u32) -> Vec<String> {
    (start..start + count)
        .map(|n| format!("{prefix}-{n:03}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_number_accepts_alphanumeric_and_dashes() {
        assert!(validate_cart_number("CART-001").is_ok());
        assert!(validate_cart_number("a1").is_ok());
        assert!(validate_cart_number("").is_err());
        assert!(validate_cart_number("CART 001").is_err());
        assert!(validate_cart_number("cart_#1").is_err());
    }

    #[test]
    fn battery_level_bounds_are_inclusive() {
        assert!(validate_battery_level(0).is_ok());
        assert!(validate_battery_level(100).is_ok());
        assert!(validate_battery_level(-1).is_err());
        assert!(validate_battery_level(101).is_err());
    }

    #[test]
    fn return_window_rejects_ten_minutes() {
        let checkout = Utc::now();
        let err = validate_return_window(checkout, checkout + Duration::minutes(10))
            .expect_err("10 minutes is below the minimum window");
        assert!(err.to_string().contains("at least 30 minutes"));
    }

    #[test]
    fn return_window_accepts_exactly_thirty_minutes() {
        let checkout = Utc::now();
        assert!(validate_return_window(checkout, checkout + Duration::minutes(30)).is_ok());
    }

    #[test]
    fn return_window_rejects_more_than_a_day() {
        let checkout = Utc::now();
        assert!(validate_return_window(checkout, checkout + Duration::hours(25)).is_err());
        assert!(validate_return_window(checkout, checkout + Duration::hours(24)).is_ok());
    }

    #[test]
    fn return_window_rejects_non_positive() {
        let checkout = Utc::now();
        assert!(validate_return_window(checkout, checkout).is_err());
        assert!(validate_return_window(checkout, checkout - Duration::hours(1)).is_err());
    }

    #[test]
    fn person_name_is_required() {
        assert!(validate_person("", None, None).is_err());
        assert!(validate_person("   ", None, None).is_err());
        assert!(validate_person("Ana", None, None).is_ok());
    }

    #[test]
    fn person_email_shape() {
        assert!(validate_person("Ana", Some("ana@example.com"), None).is_ok());
        assert!(validate_person("Ana", Some("not-an-email"), None).is_err());
        assert!(validate_person("Ana", Some("a b@example.com"), None).is_err());
        // Empty string is treated as absent, as the forms submit it.
        assert!(validate_person("Ana", Some(""), None).is_ok());
    }

    #[test]
    fn person_phone_shape() {
        assert!(validate_person("Ana", None, Some("555-123-4567")).is_ok());
        assert!(validate_person("Ana", None, Some("+1 555 123 4567")).is_ok());
        assert!(validate_person("Ana", None, Some("12345")).is_err());
        assert!(validate_person("Ana", None, Some("call me maybe")).is_err());
    }

    #[test]
    fn bulk_count_bounds() {
        assert!(validate_bulk_request("CART", 1, 1).is_ok());
        assert!(validate_bulk_request("CART", 1, 50).is_ok());
        assert!(validate_bulk_request("CART", 1, 0).is_err());
        assert!(validate_bulk_request("CART", 1, 51).is_err());
        assert!(validate_bulk_request("", 1, 5).is_err());
    }

    #[test]
    fn bulk_start_bounds() {
        assert!(validate_bulk_request("CART", 999, 50).is_ok());
        assert!(validate_bulk_request("CART", 0, 5).is_err());
        let err = validate_bulk_request("CART", 1000, 5)
            .expect_err("start above 999 is rejected");
        assert!(err.to_string().contains("between 1 and 999"));
        // The rejection keeps huge start values away from the
        // range arithmetic in bulk_cart_numbers.
        assert!(validate_bulk_request("CART", u32::MAX, 2).is_err());
    }

    #[test]
    fn bulk_numbers_are_zero_padded() {
        assert_eq!(
            bulk_cart_numbers("CART", 1, 3),
            vec!["CART-001", "CART-002", "CART-003"]
        );
        assert_eq!(bulk_cart_numbers("A", 99, 3), vec!["A-099", "A-100", "A-101"]);
    }
}
