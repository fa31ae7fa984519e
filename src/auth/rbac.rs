use serde::{Deserialize, Serialize};
use std::fmt;

use crate::auth::context::IdentityClaim;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Tecnico,
    Coordinador,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tecnico => "tecnico",
            Role::Coordinador => "coordinador",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tecnico" => Some(Role::Tecnico),
            "coordinador" => Some(Role::Coordinador),
            _ => None,
        }
    }

    /// Coordinadores act on any record regardless of who owns it.
    pub fn bypasses_ownership(&self) -> bool {
        matches!(self, Role::Coordinador)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub const TECNICO_ONLY: &[Role] = &[Role::Tecnico];
pub const COORDINADOR_ONLY: &[Role] = &[Role::Coordinador];

/// Coarse role check. Performs no I/O so it can run ahead of any query.
pub fn require_role(identity: Option<&IdentityClaim>, allowed: &[Role]) -> Result<(), ApiError> {
    let identity = identity.ok_or_else(|| ApiError::unauthenticated("Not authenticated"))?;

    if !allowed.contains(&identity.role) {
        tracing::warn!(
            user_id = identity.id,
            role = %identity.role,
            "role not allowed for operation"
        );
        let required = allowed
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(ApiError::forbidden(format!("Role {} required", required)));
    }

    Ok(())
}
