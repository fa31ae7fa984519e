#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use expedientes_backend::{
    auth::{IdentityClaim, Role, TokenService},
    config::Settings,
    error::ApiError,
    models::{
        Account, AccountCredentials, AccountFilter, Case, CaseDraft, CaseFilter, CaseStatus,
        EvidenceDraft, EvidenceItem,
    },
    repositories::{
        AccountRepository, CaseRepository, EvidenceRepository, OwnershipRepository, RecordKind,
        RecordOwner,
    },
    routes::create_router,
    utils::crypto::{hash_password, Argon2Hasher},
    AppState, Repositories,
};

pub const TEST_SECRET: &str = "test-secret-for-integration";
pub const TEST_PASSWORD: &str = "123456";

pub fn test_settings() -> Settings {
    Settings {
        database_url: "postgresql://unused/test".to_string(),
        database_max_connections: 1,
        database_acquire_timeout_seconds: 1,
        port: 0,
        environment: "test".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expires_in: "1d".to_string(),
        cors_allow_origins: vec!["*".to_string()],
        log_level: "ERROR".to_string(),
        log_format: "plain".to_string(),
    }
}

struct StoredAccount {
    account: Account,
    password_hash: String,
}

#[derive(Default)]
struct Tables {
    accounts: Vec<StoredAccount>,
    cases: Vec<Case>,
    items: Vec<EvidenceItem>,
}

/// In-memory stand-in for the Postgres gateways. Every trait call is counted
/// so tests can assert that a request never reached the store.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    pub fn seed_account(&self, username: &str, role: Role) -> IdentityClaim {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.accounts.len() as i64 + 1;
        tables.accounts.push(StoredAccount {
            account: Account {
                id,
                username: username.to_string(),
                role,
                active: true,
                registered_at: Utc::now(),
            },
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
        });
        IdentityClaim::new(id, username, role)
    }

    /// Inserts an item directly, bypassing the parent-ownership rule.
    pub fn seed_item(&self, case_id: i64, owner_technician_id: i64) -> EvidenceItem {
        let mut tables = self.tables.lock().unwrap();
        let item = EvidenceItem {
            id: tables.items.len() as i64 + 1,
            case_id,
            description: "seeded".to_string(),
            color: None,
            size: None,
            weight: 1.0,
            location: None,
            owner_technician_id,
            registered_at: Utc::now(),
            active: true,
        };
        tables.items.push(item.clone());
        item
    }

    pub fn case(&self, id: i64) -> Option<Case> {
        let tables = self.tables.lock().unwrap();
        tables.cases.iter().find(|c| c.id == id).cloned()
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn find_active_by_username(&self, username: &str) -> Result<Option<AccountCredentials>, ApiError> {
        self.touch();
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .accounts
            .iter()
            .find(|a| a.account.username == username && a.account.active)
            .map(|a| AccountCredentials {
                id: a.account.id,
                username: a.account.username.clone(),
                role: a.account.role,
                password_hash: a.password_hash.clone(),
                active: a.account.active,
            }))
    }

    async fn create(&self, username: &str, password_hash: &str, role: Role) -> Result<Account, ApiError> {
        self.touch();
        let mut tables = self.tables.lock().unwrap();
        if tables.accounts.iter().any(|a| a.account.username == username) {
            return Err(ApiError::conflict("Username already exists"));
        }
        let account = Account {
            id: tables.accounts.len() as i64 + 1,
            username: username.to_string(),
            role,
            active: true,
            registered_at: Utc::now(),
        };
        tables.accounts.push(StoredAccount {
            account: account.clone(),
            password_hash: password_hash.to_string(),
        });
        Ok(account)
    }

    async fn list(&self, filter: &AccountFilter) -> Result<(Vec<Account>, i64), ApiError> {
        self.touch();
        let tables = self.tables.lock().unwrap();
        let needle = filter.search.as_deref().map(str::to_lowercase);
        let matching: Vec<Account> = tables
            .accounts
            .iter()
            .map(|a| a.account.clone())
            .filter(|a| match &needle {
                Some(n) => a.username.to_lowercase().contains(n) || a.role.as_str().contains(n),
                None => true,
            })
            .collect();
        let total = matching.len() as i64;
        let offset = ((filter.page - 1) * filter.size) as usize;
        let page = matching
            .into_iter()
            .skip(offset)
            .take(filter.size as usize)
            .collect();
        Ok((page, total))
    }
}

#[async_trait]
impl CaseRepository for InMemoryStore {
    async fn list(&self, filter: &CaseFilter) -> Result<(Vec<Case>, i64), ApiError> {
        self.touch();
        let tables = self.tables.lock().unwrap();
        let code = filter.code.as_deref().map(str::to_lowercase);
        let mut matching: Vec<Case> = tables
            .cases
            .iter()
            .filter(|c| filter.status.map_or(true, |s| c.status == s))
            .filter(|c| code.as_ref().map_or(true, |n| c.code.to_lowercase().contains(n)))
            .filter(|c| filter.owner_technician_id.map_or(true, |id| c.owner_technician_id == id))
            .filter(|c| filter.active.map_or(true, |a| c.active == a))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.registered_at.cmp(&a.registered_at).then(b.id.cmp(&a.id)));
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.page_size as usize)
            .collect();
        Ok((page, total))
    }

    async fn find_active(&self, id: i64) -> Result<Option<Case>, ApiError> {
        self.touch();
        let tables = self.tables.lock().unwrap();
        Ok(tables.cases.iter().find(|c| c.id == id && c.active).cloned())
    }

    async fn create(&self, draft: &CaseDraft, owner_technician_id: i64) -> Result<Case, ApiError> {
        self.touch();
        let mut tables = self.tables.lock().unwrap();
        if tables.cases.iter().any(|c| c.code == draft.code) {
            return Err(ApiError::conflict("Case code already exists"));
        }
        let case = Case {
            id: tables.cases.len() as i64 + 1,
            code: draft.code.clone(),
            description: draft.description.clone(),
            registered_at: Utc::now(),
            owner_technician_id,
            status: CaseStatus::Pending,
            justification: None,
            approver_id: None,
            status_date: None,
            active: true,
        };
        tables.cases.push(case.clone());
        Ok(case)
    }

    async fn update(&self, id: i64, draft: &CaseDraft) -> Result<Option<Case>, ApiError> {
        self.touch();
        let mut tables = self.tables.lock().unwrap();
        if tables.cases.iter().any(|c| c.id != id && c.code == draft.code) {
            return Err(ApiError::conflict("Case code already exists"));
        }
        Ok(tables.cases.iter_mut().find(|c| c.id == id).map(|c| {
            c.code = draft.code.clone();
            c.description = draft.description.clone();
            c.clone()
        }))
    }

    async fn set_status(
        &self,
        id: i64,
        status: CaseStatus,
        justification: Option<&str>,
        approver_id: i64,
    ) -> Result<Option<Case>, ApiError> {
        self.touch();
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.cases.iter_mut().find(|c| c.id == id).map(|c| {
            c.status = status;
            c.justification = justification.map(str::to_string);
            c.approver_id = Some(approver_id);
            c.status_date = Some(Utc::now());
            c.clone()
        }))
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<Option<Case>, ApiError> {
        self.touch();
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.cases.iter_mut().find(|c| c.id == id).map(|c| {
            c.active = active;
            c.clone()
        }))
    }
}

#[async_trait]
impl EvidenceRepository for InMemoryStore {
    async fn list_by_case(&self, case_id: i64) -> Result<Vec<EvidenceItem>, ApiError> {
        self.touch();
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .items
            .iter()
            .filter(|i| i.case_id == case_id)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        case_id: i64,
        draft: &EvidenceDraft,
        owner_technician_id: i64,
    ) -> Result<EvidenceItem, ApiError> {
        self.touch();
        let mut tables = self.tables.lock().unwrap();
        if !tables.cases.iter().any(|c| c.id == case_id && c.active) {
            return Err(ApiError::not_found("Case not found"));
        }
        let item = EvidenceItem {
            id: tables.items.len() as i64 + 1,
            case_id,
            description: draft.description.clone(),
            color: draft.color.clone(),
            size: draft.size.clone(),
            weight: draft.weight,
            location: draft.location.clone(),
            owner_technician_id,
            registered_at: Utc::now(),
            active: true,
        };
        tables.items.push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: i64, draft: &EvidenceDraft) -> Result<Option<EvidenceItem>, ApiError> {
        self.touch();
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.items.iter_mut().find(|i| i.id == id).map(|i| {
            i.description = draft.description.clone();
            i.color = draft.color.clone();
            i.size = draft.size.clone();
            i.weight = draft.weight;
            i.location = draft.location.clone();
            i.clone()
        }))
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<Option<EvidenceItem>, ApiError> {
        self.touch();
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.items.iter_mut().find(|i| i.id == id).map(|i| {
            i.active = active;
            i.clone()
        }))
    }
}

#[async_trait]
impl OwnershipRepository for InMemoryStore {
    async fn fetch_owner(&self, kind: RecordKind, id: i64) -> Result<Option<RecordOwner>, ApiError> {
        self.touch();
        let tables = self.tables.lock().unwrap();
        let owner = match kind {
            RecordKind::Case => tables
                .cases
                .iter()
                .find(|c| c.id == id && c.active)
                .map(|c| RecordOwner {
                    owner_id: c.owner_technician_id,
                    active: c.active,
                }),
            RecordKind::EvidenceItem => tables
                .items
                .iter()
                .find(|i| i.id == id && i.active)
                .map(|i| RecordOwner {
                    owner_id: i.owner_technician_id,
                    active: i.active,
                }),
        };
        Ok(owner)
    }
}

/// Application wired over a fresh in-memory store with three accounts:
/// two tecnicos and one coordinador.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub tecnico1: IdentityClaim,
    pub tecnico2: IdentityClaim,
    pub coordinador: IdentityClaim,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let tecnico1 = store.seed_account("tecnico1", Role::Tecnico);
        let tecnico2 = store.seed_account("tecnico2", Role::Tecnico);
        let coordinador = store.seed_account("coordinador", Role::Coordinador);

        let repositories = Repositories {
            cases: store.clone(),
            evidence: store.clone(),
            accounts: store.clone(),
            ownership: store.clone(),
        };
        let state = AppState::from_repositories(test_settings(), repositories, Arc::new(Argon2Hasher), None)
            .expect("test state");
        let router = create_router(state.clone());

        Self {
            state,
            router,
            store,
            tecnico1,
            tecnico2,
            coordinador,
        }
    }

    pub fn token_for(&self, identity: &IdentityClaim) -> String {
        self.state.token_service.issue(identity).unwrap()
    }

    /// Signs with the same secret but an issue time two days back, so the
    /// one-day credential is already expired.
    pub fn expired_token_for(&self, identity: &IdentityClaim) -> String {
        let tokens = TokenService::new(TEST_SECRET, std::time::Duration::from_secs(86_400));
        tokens
            .issue_at(identity, Utc::now() - chrono::Duration::days(2))
            .unwrap()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}

pub fn case_draft(code: &str) -> CaseDraft {
    CaseDraft {
        code: code.to_string(),
        description: format!("description of {}", code),
    }
}

pub fn evidence_draft(description: &str) -> EvidenceDraft {
    EvidenceDraft {
        description: description.to_string(),
        color: Some("rojo".to_string()),
        size: Some("pequeño".to_string()),
        weight: 2.5,
        location: Some("bodega 3".to_string()),
    }
}
