use crate::auth::context::IdentityClaim;
use crate::auth::rbac::{Role, COORDINADOR_ONLY};
use crate::error::ApiError;
use crate::models::{Account, AccountFilter, AccountPage};
use crate::repositories::AccountRepository;
use crate::utils::crypto::CredentialHasher;
use std::sync::Arc;

pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone)]
pub struct AccountDraft {
    pub username: String,
    pub password: String,
    pub role: Role,
}

pub struct AccountService {
    accounts: Arc<dyn AccountRepository + Send + Sync>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountRepository + Send + Sync>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { accounts, hasher }
    }

    pub async fn create(&self, identity: &IdentityClaim, draft: AccountDraft) -> Result<Account, ApiError> {
        identity.require_role(COORDINADOR_ONLY)?;

        let password_hash = self.hasher.hash(&draft.password)?;
        let account = self
            .accounts
            .create(&draft.username, &password_hash, draft.role)
            .await?;

        tracing::info!(
            user_id = identity.id,
            account_id = account.id,
            role = %account.role,
            "account created"
        );
        Ok(account)
    }

    pub async fn list(&self, identity: &IdentityClaim, filter: AccountFilter) -> Result<AccountPage, ApiError> {
        identity.require_role(COORDINADOR_ONLY)?;

        if filter.page < 1 {
            return Err(ApiError::validation("Field 'page' must be at least 1"));
        }
        if filter.size < 1 || filter.size > MAX_PAGE_SIZE {
            return Err(ApiError::validation(format!(
                "Field 'size' must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let (data, total) = self.accounts.list(&filter).await?;

        Ok(AccountPage {
            total,
            page: filter.page,
            size: filter.size,
            data,
        })
    }
}
