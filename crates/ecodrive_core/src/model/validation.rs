//! Input validation shared by services.
//!
//! Mirrors the form checks of the mobile client so every caller of the
//! core gets the same guarantees.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Minimum accepted password length in characters.
pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email regex"));

/// Rejected user or entity input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyName,
    InvalidEmail(String),
    EmptyPassword,
    PasswordTooShort { min_chars: usize },
    EmptyServiceType,
    NoSymptoms,
    InvalidCost(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
            Self::EmptyPassword => write!(f, "password cannot be empty"),
            Self::PasswordTooShort { min_chars } => {
                write!(f, "password must be at least {min_chars} characters")
            }
            Self::EmptyServiceType => write!(f, "service type cannot be empty"),
            Self::NoSymptoms => write!(f, "at least one symptom is required"),
            Self::InvalidCost(value) => {
                write!(f, "cost must be a non-negative number, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

/// Checks a password chosen at registration or password change.
pub fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort {
            min_chars: MIN_PASSWORD_CHARS,
        });
    }
    Ok(())
}

pub fn validate_service_type(service_type: &str) -> Result<(), ValidationError> {
    if service_type.trim().is_empty() {
        return Err(ValidationError::EmptyServiceType);
    }
    Ok(())
}

pub fn validate_cost(cost: f64) -> Result<(), ValidationError> {
    if cost.is_finite() && cost >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidCost(cost.to_string()))
    }
}
