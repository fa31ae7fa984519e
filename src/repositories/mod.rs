pub mod account_repo;
pub mod case_repo;
pub mod evidence_repo;
pub mod ownership_repo;

pub use account_repo::AccountRepository;
pub use case_repo::CaseRepository;
pub use evidence_repo::EvidenceRepository;
pub use ownership_repo::{OwnershipRepository, RecordKind, RecordOwner};
