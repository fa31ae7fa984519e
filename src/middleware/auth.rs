use crate::auth::context::IdentityClaim;
use crate::auth::rbac::{require_role, Role};
use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Bearer authentication middleware.
/// Verifies the credential and attaches the resulting `IdentityClaim` to the
/// request; nothing downstream runs for an unauthenticated caller.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = match bearer_token(request.headers()) {
        Some(raw) => state.token_service.verify(raw)?,
        None => {
            tracing::debug!("Authentication failed: no bearer token");
            return Err(ApiError::unauthenticated("Missing bearer token"));
        }
    };

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Per-route role gate, layered after `auth_middleware` so it short-circuits
/// before body parsing or any store access.
pub async fn role_gate_middleware(
    State(allowed): State<&'static [Role]>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(request.extensions().get::<IdentityClaim>(), allowed)?;
    Ok(next.run(request).await)
}
