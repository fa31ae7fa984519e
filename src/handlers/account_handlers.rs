use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;

use crate::{
    auth::{context::IdentityClaim, rbac::Role},
    error::ApiError,
    handlers::{AppJson, AppQuery},
    models::{Account, AccountFilter, AccountPage},
    services::AccountDraft,
    utils::validation::{max_length, optional_text, require_text, USERNAME_MAX_LEN},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct AccountRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AccountListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
    pub search: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

/// POST /api/usuarios (coordinador only)
pub async fn create_account(
    State(app_state): State<AppState>,
    identity: IdentityClaim,
    AppJson(payload): AppJson<AccountRequest>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let username = max_length(
        require_text(payload.username, "username")?.trim().to_string(),
        "username",
        USERNAME_MAX_LEN,
    )?;
    let password = require_text(payload.password, "password")?;
    let raw_role = require_text(payload.role, "role")?;
    let role = Role::from_str(&raw_role).ok_or_else(|| {
        ApiError::validation("Field 'role' must be 'tecnico' or 'coordinador'")
    })?;

    let account = app_state
        .account_service
        .create(
            &identity,
            AccountDraft {
                username,
                password,
                role,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /api/usuarios (coordinador only)
pub async fn list_accounts(
    State(app_state): State<AppState>,
    identity: IdentityClaim,
    AppQuery(params): AppQuery<AccountListQuery>,
) -> Result<Json<AccountPage>, ApiError> {
    let filter = AccountFilter {
        search: optional_text(params.search).map(|s| s.trim().to_string()),
        page: params.page,
        size: params.size,
    };

    let page = app_state.account_service.list(&identity, filter).await?;
    Ok(Json(page))
}
