use crate::auth::context::IdentityClaim;
use crate::auth::token::TokenService;
use crate::error::ApiError;
use crate::repositories::AccountRepository;
use crate::utils::crypto::CredentialHasher;
use serde::Serialize;
use std::sync::Arc;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Issued credential plus the identity it encodes.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: IdentityClaim,
}

pub struct AuthService {
    accounts: Arc<dyn AccountRepository + Send + Sync>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountRepository + Send + Sync>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            tokens,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSession, ApiError> {
        let account = match self.accounts.find_active_by_username(username).await? {
            Some(account) => account,
            None => {
                tracing::warn!(username = %username, "login attempt for unknown or inactive user");
                return Err(ApiError::unauthenticated(INVALID_CREDENTIALS));
            }
        };

        if !self.hasher.verify(password, &account.password_hash)? {
            tracing::warn!(user_id = account.id, "login attempt with wrong password");
            return Err(ApiError::unauthenticated(INVALID_CREDENTIALS));
        }

        let user = IdentityClaim::new(account.id, account.username, account.role);
        let token = self.tokens.issue(&user)?;

        tracing::info!(user_id = user.id, role = %user.role, "user logged in");
        Ok(AuthSession { token, user })
    }

    /// Stateless re-issue for a claim that already passed verification.
    pub fn refresh(&self, identity: &IdentityClaim) -> Result<AuthSession, ApiError> {
        let token = self.tokens.issue(identity)?;
        Ok(AuthSession {
            token,
            user: identity.clone(),
        })
    }
}
