//! Authentication primitives.
//!
//! - [`password`] -- Argon2id hashing and the minimum-length rule.
//! - [`jwt`] -- access tokens and refresh-token helpers.
//! - [`bootstrap`] -- creation of the first admin account.

pub mod bootstrap;
pub mod jwt;
pub mod password;
