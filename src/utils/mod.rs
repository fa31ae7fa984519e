pub mod crypto;
pub mod validation;
