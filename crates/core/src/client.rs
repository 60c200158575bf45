//! Client registry rules: field validation, optional-field normalization and
//! the client search predicate.

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::search::any_field_matches;

/// Maximum length accepted for a client name.
pub const MAX_NAME_LEN: usize = 200;

/// Trim an optional text field and collapse empty values to `None`.
///
/// Forms submit blank inputs as `""`; the database stores them as NULL.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validate the editable client fields.
///
/// - `name` is required and must not be blank.
/// - `email`, when present and non-blank, must be a syntactically valid address.
pub fn validate_client(name: &str, email: Option<&str>) -> Result<(), CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::validation("Client name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Client name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    if let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) {
        if !email.validate_email() {
            return Err(CoreError::Validation(format!(
                "Invalid email address '{email}'"
            )));
        }
    }
    Ok(())
}

/// Client search: matches the name or the email.
pub fn client_matches(name: &str, email: Option<&str>, term: &str) -> bool {
    any_field_matches([Some(name), email], term)
}
