pub mod account;
pub mod case;
pub mod evidence;

pub use account::*;
pub use case::*;
pub use evidence::*;
