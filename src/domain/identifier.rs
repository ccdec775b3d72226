//! Identifier validation shared by catalog entities

use once_cell::sync::Lazy;
use regex::Regex;

use super::DomainError;

/// Maximum length for entity IDs
pub const MAX_ID_LENGTH: usize = 64;

/// Alphanumeric with inner hyphens or underscores
static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9](?:[a-zA-Z0-9_-]*[a-zA-Z0-9])?$").unwrap());

/// Validate an entity identifier, naming the entity kind in errors
pub fn validate_identifier(kind: &str, id: &str) -> Result<(), DomainError> {
    if id.is_empty() {
        return Err(DomainError::invalid_id(format!("{} ID cannot be empty", kind)));
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(DomainError::invalid_id(format!(
            "{} ID exceeds maximum length of {} characters",
            kind, MAX_ID_LENGTH
        )));
    }

    if !ID_PATTERN.is_match(id) {
        return Err(DomainError::invalid_id(format!(
            "Invalid {} ID '{}': must be alphanumeric with hyphens or underscores",
            kind.to_lowercase(),
            id
        )));
    }

    Ok(())
}
