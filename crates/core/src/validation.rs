//! Field validation shared by all record inputs.

use crate::types::{EmailError, PriceError};

/// A record failed validation. The message is shown to API callers as-is.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),
    #[error("invalid price: {0}")]
    Price(#[from] PriceError),
    #[error("\"{0}\" is a reserved product name")]
    ReservedName(String),
}

impl ValidationError {
    /// Name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Required { field } | Self::TooLong { field, .. } => field,
            Self::Email(_) => "email",
            Self::Price(_) => "price",
            Self::ReservedName(_) => "name",
        }
    }
}

/// Trim `value` and require it to be non-empty and at most `max` characters.
///
/// # Errors
///
/// [`ValidationError::Required`] for blank input, [`ValidationError::TooLong`]
/// past `max` characters.
pub fn required(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    bounded(field, value, max)
}

/// Trim `value` and cap it at `max` characters. Blank is allowed.
///
/// # Errors
///
/// [`ValidationError::TooLong`] past `max` characters.
pub fn bounded(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", "  Kashmir White ", 50), Ok("Kashmir White".into()));
    }

    #[test]
    fn test_required_rejects_blank() {
        assert_eq!(
            required("caption", " \t", 50),
            Err(ValidationError::Required { field: "caption" })
        );
    }

    #[test]
    fn test_bounded_counts_chars_not_bytes() {
        assert!(bounded("tag", "ééé", 3).is_ok());
        assert_eq!(
            bounded("tag", "éééé", 3),
            Err(ValidationError::TooLong { field: "tag", max: 3 })
        );
    }

    #[test]
    fn test_error_message_names_field() {
        let err = ValidationError::Required { field: "productId" };
        assert_eq!(err.to_string(), "productId is required");
        assert_eq!(err.field(), "productId");
    }
}
