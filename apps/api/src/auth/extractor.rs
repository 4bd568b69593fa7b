use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use tracing::debug;

use super::session::parse_session_cookie;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// The signed-in user, resolved from the `session` cookie.
///
/// Use `Option<CurrentUser>` for routes that also serve anonymous callers;
/// any rejection then degrades to `None`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(parse_session_cookie)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

        let user_id = state
            .sessions
            .verify(&token)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        let user = state
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        debug!("Authenticated request for user {}", user.id);
        Ok(CurrentUser(user))
    }
}
