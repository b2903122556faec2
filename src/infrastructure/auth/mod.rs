//! Session handling - token storage, introspection, auth backend calls

mod introspect;
mod service;
mod token_store;

pub use introspect::peek_claims;
pub use service::AuthService;
pub use token_store::{InMemoryTokenStore, TokenStore};
