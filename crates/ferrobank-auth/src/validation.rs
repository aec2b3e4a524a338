//! Explicit input validation.
//!
//! Validation happens at the boundary before a request reaches the core
//! services. Each check returns a list of [`FieldViolation`]s rather than
//! failing fast, so callers receive every problem in one response.

use serde::{Deserialize, Serialize};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// The offending field, as named in the request payload.
    pub field: String,

    /// Human-readable description of the violation.
    pub message: String,
}

impl FieldViolation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Pluggable password strength predicate.
///
/// The policy is deliberately not part of the core: deployments swap it
/// without touching registration logic.
pub trait PasswordPolicy: Send + Sync {
    /// Checks `raw`, returning a violation message when it is too weak.
    fn check(&self, raw: &str) -> Result<(), String>;
}

/// Default password policy.
///
/// Requires at least 12 characters with at least one lowercase letter, one
/// uppercase letter, one digit and one special character from `@#$%^&+=!`.
#[derive(Debug, Clone, Copy)]
pub struct DefaultPasswordPolicy {
    /// Minimum accepted length.
    pub min_length: usize,
}

impl Default for DefaultPasswordPolicy {
    fn default() -> Self {
        Self { min_length: 12 }
    }
}

const SPECIAL_CHARS: &str = "@#$%^&+=!";

impl PasswordPolicy for DefaultPasswordPolicy {
    fn check(&self, raw: &str) -> Result<(), String> {
        let long_enough = raw.chars().count() >= self.min_length;
        let has_lower = raw.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = raw.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = raw.chars().any(|c| c.is_ascii_digit());
        let has_special = raw.chars().any(|c| SPECIAL_CHARS.contains(c));

        if long_enough && has_lower && has_upper && has_digit && has_special {
            Ok(())
        } else {
            Err(format!(
                "password must be at least {} characters and contain lowercase, \
                 uppercase, digit and one of {}",
                self.min_length, SPECIAL_CHARS
            ))
        }
    }
}

/// Validates an email address structurally.
///
/// This is a shape check (local part, `@`, domain with a dot), not a
/// deliverability check.
#[must_use]
pub fn validate_email(field: &str, email: &str) -> Option<FieldViolation> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();

    let valid = !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace);

    if valid {
        None
    } else {
        Some(FieldViolation::new(field, "e-mail is not valid"))
    }
}

/// Validates that a required string field is non-empty.
#[must_use]
pub fn validate_not_empty(field: &str, value: &str) -> Option<FieldViolation> {
    if value.trim().is_empty() {
        Some(FieldViolation::new(field, "must not be empty"))
    } else {
        None
    }
}
