//! Refresh-token sessions.
//!
//! Only the SHA-256 of a refresh token is stored; the token itself is shown
//! to the client once and never persisted.

use progettare_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row of `user_sessions`: one outstanding refresh token.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshSession {
    pub id: DbId,
    pub user_id: DbId,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
}

/// A refresh token about to be handed out.
#[derive(Debug)]
pub struct NewRefreshSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
