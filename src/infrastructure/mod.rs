//! Infrastructure - transport, deduplication, session handling, services

pub mod auth;
pub mod dedup;
pub mod http;
pub mod items;
pub mod logging;
pub mod search;
pub mod users;

pub use auth::{AuthService, InMemoryTokenStore, TokenStore};
pub use http::ApiClient;
pub use items::ItemService;
pub use search::SearchService;
pub use users::UserService;
