//! Client-side form validation
//!
//! Plain checks, no schema library: required fields must be non-blank,
//! emails and phone numbers must match a pattern, numbers must be positive.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// One failed check on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub trait Validate {
    /// All problems with the form; empty means valid
    fn validate(&self) -> Vec<FieldError>;
}

/// Accumulates field errors
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &'static str, message: String) {
        self.errors.push(FieldError { field, message });
    }

    pub fn required(&mut self, field: &'static str, label: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, format!("{} is required", label));
        }
        self
    }

    pub fn email(&mut self, field: &'static str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, "Email is required".to_string());
        } else if !email_regex().is_match(value.trim()) {
            self.fail(field, "Email is not valid".to_string());
        }
        self
    }

    /// Optional phone number; checked only when present
    pub fn phone(&mut self, field: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            if !phone_regex().is_match(value) {
                self.fail(field, "Phone number must be 10 or 11 digits".to_string());
            }
        }
        self
    }

    pub fn positive(&mut self, field: &'static str, label: &str, value: f64) -> &mut Self {
        if !(value > 0.0) {
            self.fail(field, format!("{} must be greater than 0", label));
        }
        self
    }

    pub fn non_negative(&mut self, field: &'static str, label: &str, value: f64) -> &mut Self {
        if value < 0.0 || value.is_nan() {
            self.fail(field, format!("{} cannot be negative", label));
        }
        self
    }

    pub fn min_len(&mut self, field: &'static str, label: &str, value: &str, min: usize) -> &mut Self {
        if value.chars().count() < min {
            self.fail(field, format!("{} must be at least {} characters", label, min));
        }
        self
    }

    pub fn finish(&mut self) -> Vec<FieldError> {
        std::mem::take(&mut self.errors)
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern")
    })
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[0-9]{10,11}$").expect("phone pattern"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        let errors = Checks::new()
            .required("title", "Title", "   ")
            .required("level", "Level", "A1")
            .finish();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "title");
        assert_eq!(errors[0].message, "Title is required");
    }

    #[test]
    fn test_email_patterns() {
        assert!(Checks::new().email("email", "ada@example.com").finish().is_empty());
        assert_eq!(Checks::new().email("email", "ada@").finish()[0].message, "Email is not valid");
        assert_eq!(Checks::new().email("email", "").finish()[0].message, "Email is required");
    }

    #[test]
    fn test_phone_optional() {
        assert!(Checks::new().phone("phoneNumber", None).finish().is_empty());
        assert!(Checks::new().phone("phoneNumber", Some("0912345678")).finish().is_empty());
        assert_eq!(Checks::new().phone("phoneNumber", Some("12-34")).finish().len(), 1);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(Checks::new().positive("duration", "Duration", 0.0).finish().len(), 1);
        assert!(Checks::new().non_negative("score", "Score", 0.0).finish().is_empty());
        assert_eq!(Checks::new().non_negative("score", "Score", -1.0).finish().len(), 1);
    }
}
