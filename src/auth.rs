//! Auth-domain token model and token stores.

pub mod store;
pub mod token;

pub use store::*;
pub use token::*;
