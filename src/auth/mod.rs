pub mod context;
pub mod ownership;
pub mod rbac;
pub mod token;

pub use context::IdentityClaim;
pub use ownership::OwnershipResolver;
pub use rbac::{require_role, Role};
pub use token::TokenService;
