use std::sync::Arc;

use crate::{
    auth::{OwnershipResolver, TokenService},
    config::Settings,
    database::DatabasePool,
    repositories::{
        account_repo::SqlxAccountRepository, case_repo::SqlxCaseRepository,
        evidence_repo::SqlxEvidenceRepository, ownership_repo::SqlxOwnershipRepository,
        AccountRepository, CaseRepository, EvidenceRepository, OwnershipRepository,
    },
    services::{AccountService, AuthService, CaseService, EvidenceService},
    utils::crypto::{Argon2Hasher, CredentialHasher},
};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;

/// Storage gateway handles the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub cases: Arc<dyn CaseRepository + Send + Sync>,
    pub evidence: Arc<dyn EvidenceRepository + Send + Sync>,
    pub accounts: Arc<dyn AccountRepository + Send + Sync>,
    pub ownership: Arc<dyn OwnershipRepository + Send + Sync>,
}

impl Repositories {
    pub fn sqlx(pool: &DatabasePool) -> Self {
        Self {
            cases: Arc::new(SqlxCaseRepository::new(pool.clone())),
            evidence: Arc::new(SqlxEvidenceRepository::new(pool.clone())),
            accounts: Arc::new(SqlxAccountRepository::new(pool.clone())),
            ownership: Arc::new(SqlxOwnershipRepository::new(pool.clone())),
        }
    }
}

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db_pool: Option<DatabasePool>,
    pub token_service: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub case_service: Arc<CaseService>,
    pub evidence_service: Arc<EvidenceService>,
    pub account_service: Arc<AccountService>,
}

impl AppState {
    /// Create new application state, opening the database pool
    pub async fn new(config: Settings) -> Result<Self, crate::error::ApiError> {
        let db_pool = crate::database::create_connection_pool(&config).await?;
        Self::new_with_pool(config, db_pool)
    }

    /// Create new application state with existing database pool
    pub fn new_with_pool(config: Settings, db_pool: DatabasePool) -> Result<Self, crate::error::ApiError> {
        let repositories = Repositories::sqlx(&db_pool);
        Self::from_repositories(config, repositories, Arc::new(Argon2Hasher), Some(db_pool))
    }

    /// Wire services over arbitrary storage gateways.
    pub fn from_repositories(
        config: Settings,
        repositories: Repositories,
        hasher: Arc<dyn CredentialHasher>,
        db_pool: Option<DatabasePool>,
    ) -> Result<Self, crate::error::ApiError> {
        config.validate()?;
        let config = Arc::new(config);

        let token_service = Arc::new(TokenService::new(&config.jwt_secret, config.token_ttl()));
        let ownership = OwnershipResolver::new(repositories.ownership.clone());

        let auth_service = Arc::new(AuthService::new(
            repositories.accounts.clone(),
            hasher.clone(),
            token_service.clone(),
        ));
        let case_service = Arc::new(CaseService::new(repositories.cases.clone(), ownership.clone()));
        let evidence_service = Arc::new(EvidenceService::new(repositories.evidence.clone(), ownership));
        let account_service = Arc::new(AccountService::new(repositories.accounts, hasher));

        Ok(Self {
            config,
            db_pool,
            token_service,
            auth_service,
            case_service,
            evidence_service,
            account_service,
        })
    }
}
