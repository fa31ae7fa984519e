pub mod account_service;
pub mod auth_service;
pub mod case_service;
pub mod evidence_service;

pub use account_service::{AccountDraft, AccountService};
pub use auth_service::{AuthService, AuthSession};
pub use case_service::CaseService;
pub use evidence_service::EvidenceService;
