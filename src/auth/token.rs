//! Credential issuance and verification.
//!
//! Credentials are HS256 JWTs carrying the identity claim plus `iat`/`exp`.
//! Verification is a pure function of the shared secret and the clock; there
//! is no revocation list.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::auth::context::IdentityClaim;
use crate::auth::rbac::Role;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialClaims {
    id: i64,
    username: String,
    role: Role,
    iat: i64,
    exp: i64,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, claim: &IdentityClaim) -> Result<String, ApiError> {
        self.issue_at(claim, Utc::now())
    }

    /// Signs a credential as if issued at `issued_at`.
    pub fn issue_at(&self, claim: &IdentityClaim, issued_at: DateTime<Utc>) -> Result<String, ApiError> {
        let iat = issued_at.timestamp();
        let exp = iat.saturating_add(i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX));

        let claims = CredentialClaims {
            id: claim.id,
            username: claim.username.clone(),
            role: claim.role,
            iat,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    pub fn verify(&self, raw: &str) -> Result<IdentityClaim, ApiError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ApiError::unauthenticated("Bearer token required"));
        }

        let data = decode::<CredentialClaims>(raw, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "credential rejected");
            ApiError::unauthenticated("Invalid or expired token")
        })?;

        let claims = data.claims;
        Ok(IdentityClaim {
            id: claims.id,
            username: claims.username,
            role: claims.role,
        })
    }
}

/// Longest accepted credential lifetime (ten Julian years).
pub const MAX_TTL: Duration = Duration::from_secs(315_576_000);

/// Parses a credential lifetime: all digits means absolute seconds, anything
/// else is a humantime expression (`90s`, `30m`, `12h`, `1d`, `2days`, `1h 30m`).
/// Zero, sub-second and lifetimes above [`MAX_TTL`] are rejected.
pub fn parse_ttl(expr: &str) -> Option<Duration> {
    let expr = expr.trim();
    if expr.is_empty() {
        return None;
    }

    let ttl = if expr.chars().all(|c| c.is_ascii_digit()) {
        Duration::from_secs(expr.parse().ok()?)
    } else {
        humantime::parse_duration(expr).ok()?
    };

    (ttl.as_secs() >= 1 && ttl <= MAX_TTL).then(|| Duration::from_secs(ttl.as_secs()))
}
