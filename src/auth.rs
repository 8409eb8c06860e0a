//! Credentials, bearer tokens, and the caching client-credentials authenticator.

pub mod authenticator;
pub mod secret;
pub mod token;

pub use authenticator::*;
pub use secret::*;
pub use token::*;
