//! Admin-only gate.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use progettare_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An [`AuthUser`] holding the `admin` role; operators get 403.
///
/// Used by the permanent-deletion routes of the recycle bin.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only an administrator can delete fabrics permanently".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
