//! Input validation for lead fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Contact type outside the known buckets.
    UnknownContactType(String),
    /// Notes that are not a JSON object.
    InvalidNotes(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownContactType(kind) => {
                write!(f, "Unknown contact type: {}", kind)
            }
            ValidationError::InvalidNotes(msg) => write!(f, "Invalid notes: {}", msg),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Contact buckets a lead may come from.
pub const CONTACT_TYPES: &[&str] = &["phone", "email", "name", "investor_type", "company"];

/// Maximum allowed length for a lead status.
pub const MAX_STATUS_LENGTH: usize = 64;

/// Maximum allowed length for a contact value (matches the email limit).
pub const MAX_CONTACT_VALUE_LENGTH: usize = 254;

/// Maximum allowed length for serialized notes.
pub const MAX_NOTES_LENGTH: usize = 4096;

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual,
        });
    }
    Ok(())
}

/// Validate a lead pipeline status such as `new` or `contacted`.
pub fn validate_lead_status(status: &str) -> Result<(), ValidationError> {
    let status = status.trim();
    if status.is_empty() {
        return Err(ValidationError::Empty("status".to_string()));
    }
    check_length("status", status, MAX_STATUS_LENGTH)
}

/// Validate a contact bucket name.
pub fn validate_contact_type(contact_type: &str) -> Result<(), ValidationError> {
    if CONTACT_TYPES.contains(&contact_type) {
        Ok(())
    } else {
        Err(ValidationError::UnknownContactType(contact_type.to_string()))
    }
}

/// Validate an extracted contact value.
pub fn validate_contact_value(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty("contact value".to_string()));
    }
    check_length("contact value", value, MAX_CONTACT_VALUE_LENGTH)
}

/// Validate notes supplied with a status update. Must be a JSON object.
pub fn validate_notes(notes: &serde_json::Value) -> Result<(), ValidationError> {
    if !notes.is_object() {
        return Err(ValidationError::InvalidNotes(
            "must be a JSON object".to_string(),
        ));
    }
    check_length("notes", &notes.to_string(), MAX_NOTES_LENGTH)
}
