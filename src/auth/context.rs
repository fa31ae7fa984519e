use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};

use crate::auth::rbac::{require_role, Role};
use crate::error::ApiError;

/// Verified caller identity, threaded explicitly into every core operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl IdentityClaim {
    pub fn new(id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
        }
    }

    pub fn is_coordinador(&self) -> bool {
        self.role == Role::Coordinador
    }

    pub fn require_role(&self, allowed: &[Role]) -> Result<(), ApiError> {
        require_role(Some(self), allowed)
    }
}

/// Pulls the identity placed in request extensions by the auth middleware.
#[async_trait]
impl<S> FromRequestParts<S> for IdentityClaim
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityClaim>()
            .cloned()
            .ok_or_else(|| ApiError::unauthenticated("Not authenticated"))
    }
}
