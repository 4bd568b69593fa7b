use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use super::extractor::CurrentUser;
use super::session::{logout_cookie, session_cookie};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub picture: String,
}

fn callback_url(state: &AppState) -> String {
    format!(
        "{}/api/auth/callback",
        state.config.public_url.trim_end_matches('/')
    )
}

/// GET /api/auth/login
pub async fn handle_login(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.identity.authorize_url(&callback_url(&state)))
}

/// GET /api/auth/callback?code=
/// Exchanges the code, upserts the user and starts a session.
pub async fn handle_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AppError> {
    let profile = state
        .identity
        .exchange(&query.code, &callback_url(&state))
        .await
        .map_err(|e| {
            error!("Google OAuth exchange failed: {e}");
            AppError::BadGateway(e.to_string())
        })?;

    let user = state.store.upsert_user(&profile).await?;
    info!("User logged in: {} ({})", user.email, user.id);

    let token = state
        .sessions
        .issue(user.id)
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        [(header::SET_COOKIE, session_cookie(token).to_string())],
        Redirect::temporary(&state.config.frontend_url),
    )
        .into_response())
}

/// GET /api/auth/me
pub async fn handle_me(CurrentUser(user): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        picture: user.picture,
    })
}

/// POST /api/auth/logout
pub async fn handle_logout() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, logout_cookie().to_string())],
    )
}
