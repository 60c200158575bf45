//! Well-known role names.
//!
//! These must match the `CHECK` constraint on `users.role` in
//! `20261001000002_create_users_and_sessions.sql`.

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_OPERATOR: &str = "operator";

const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_OPERATOR];

/// Validate that `role` is one of the known role names.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {VALID_ROLES:?}"
        )))
    }
}
