//! OAuth2 client-credentials flow (RFC 7523 private-key JWT assertions).

pub mod key;
pub mod token;

pub use key::resolve_private_key;
pub use token::TokenProvider;
