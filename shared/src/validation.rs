//! Input validation functions
//!
//! This module provides validation utilities for user and recipe input.
//! Email syntax checks delegate to the `validator` crate.

use rust_decimal::Decimal;
use validator::ValidateEmail;

/// Minimum password length accepted on user creation and update
pub const PASSWORD_MIN_LENGTH: usize = 5;

/// Maximum password length
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Maximum length of short text columns (name, title, link)
pub const MAX_CHAR_FIELD_LENGTH: usize = 255;

/// Largest price representable as NUMERIC(5, 2)
pub const MAX_PRICE_EXCLUSIVE: i64 = 1000;

/// Normalize an email address by lower-casing its domain part.
///
/// The local part is left untouched, so `Test2@Example.com` becomes
/// `Test2@example.com`. Surrounding whitespace is trimmed.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::new("email", "This field may not be blank"));
    }
    if email.len() > MAX_CHAR_FIELD_LENGTH {
        return Err(ValidationError::new("email", "Email too long"));
    }
    if !email.validate_email() {
        return Err(ValidationError::new("email", "Enter a valid email address"));
    }
    Ok(())
}

/// Validate password length
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(ValidationError::new(
            "password",
            &format!(
                "Ensure this field has at least {} characters",
                PASSWORD_MIN_LENGTH
            ),
        ));
    }
    if password.chars().count() > PASSWORD_MAX_LENGTH {
        return Err(ValidationError::new("password", "Password too long"));
    }
    Ok(())
}

/// Validate a display name (blank allowed)
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    max_length("name", name)
}

// ============================================================================
// Recipe Validation
// ============================================================================

/// Validate recipe title
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("title", "This field may not be blank"));
    }
    max_length("title", title)
}

/// Validate preparation time in minutes
pub fn validate_time_minutes(minutes: i32) -> Result<(), ValidationError> {
    if minutes < 0 {
        return Err(ValidationError::new(
            "time_minutes",
            "Ensure this value is greater than or equal to 0",
        ));
    }
    Ok(())
}

/// Validate price against NUMERIC(5, 2)
pub fn validate_price(price: Decimal) -> Result<(), ValidationError> {
    if price.normalize().scale() > 2 {
        return Err(ValidationError::new(
            "price",
            "Ensure that there are no more than 2 decimal places",
        ));
    }
    if price.abs() >= Decimal::from(MAX_PRICE_EXCLUSIVE) {
        return Err(ValidationError::new(
            "price",
            "Ensure that there are no more than 5 digits in total",
        ));
    }
    Ok(())
}

/// Validate recipe link (blank allowed)
pub fn validate_link(link: &str) -> Result<(), ValidationError> {
    max_length("link", link)
}

fn max_length(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_CHAR_FIELD_LENGTH {
        return Err(ValidationError::new(
            field,
            &format!(
                "Ensure this field has no more than {} characters",
                MAX_CHAR_FIELD_LENGTH
            ),
        ));
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "email" => "Email",
        "password" => "Password",
        "password1" | "password2" => "Password",
        "name" => "Name",
        "title" => "Title",
        "time_minutes" => "Preparation Time",
        "price" => "Price",
        "link" => "Link",
        "description" => "Description",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{display_label}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}
