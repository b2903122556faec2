//! Domain types - wire shapes shared with the platform backends

pub mod auth;
pub mod error;
pub mod item;
pub mod response;
pub mod search;
pub mod user;

pub use auth::{TokenClaims, TokenPair};
pub use error::ApiError;
pub use item::{Item, ItemDetail, ItemPage};
pub use response::ApiResponse;
pub use search::{CombinedResults, ScopedResults, SearchOptions};
pub use user::{User, UserPage};
