use axum::{extract::State, response::Json};
use serde::Deserialize;

use crate::{
    auth::context::IdentityClaim,
    error::ApiError,
    handlers::AppJson,
    services::AuthSession,
    utils::validation::require_text,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthSession>, ApiError> {
    let username = require_text(payload.username, "username")?;
    let password = require_text(payload.password, "password")?;

    let session = app_state.auth_service.login(&username, &password).await?;
    Ok(Json(session))
}

/// GET /api/auth/me
pub async fn get_me(identity: IdentityClaim) -> Json<IdentityClaim> {
    Json(identity)
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(app_state): State<AppState>,
    identity: IdentityClaim,
) -> Result<Json<AuthSession>, ApiError> {
    let session = app_state.auth_service.refresh(&identity)?;
    Ok(Json(session))
}
