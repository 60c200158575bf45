//! First admin account, created at startup from `ADMIN_USERNAME` /
//! `ADMIN_PASSWORD`.

use progettare_core::roles::ROLE_ADMIN;
use progettare_db::models::user::{CreateUser, User};
use progettare_db::repositories::UserRepo;
use progettare_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};

/// Create the admin account unless a user with that name already exists.
///
/// Returns the created user, or `None` when nothing had to be done. An
/// existing account is left untouched, whatever its role or password.
pub async fn ensure_admin(pool: &DbPool, admin: &AdminBootstrap) -> AppResult<Option<User>> {
    if UserRepo::find_by_username(pool, &admin.username)
        .await?
        .is_some()
    {
        return Ok(None);
    }

    validate_password_strength(&admin.password)?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: admin.username.clone(),
            password_hash,
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await?;
    tracing::info!(user_id = user.id, username = %user.username, "Created bootstrap admin");
    Ok(Some(user))
}
