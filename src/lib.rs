//! Platform API client
//!
//! Request-orchestration layer for the content platform's REST backends
//! (items, users, search, auth):
//! - in-flight deduplication of identical concurrent reads
//! - session token storage with 401 refresh-and-retry
//! - typed wire shapes for every backend response

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::ApiError;

use std::sync::Arc;

use infrastructure::{
    auth::InMemoryTokenStore, ApiClient, AuthService, ItemService, SearchService, UserService,
};

/// One configured connection to the platform: a shared [`ApiClient`] and a
/// service per backend, all bound to the same session.
#[derive(Debug)]
pub struct Platform {
    client: ApiClient,
    pub auth: AuthService,
    pub items: ItemService,
    pub users: UserService,
    pub search: SearchService,
}

impl Platform {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let tokens = Arc::new(InMemoryTokenStore::new());
        let client = ApiClient::new(&config.api, &config.dedup, tokens)?;

        Ok(Self {
            auth: AuthService::new(client.clone()),
            items: ItemService::new(client.clone()),
            users: UserService::new(client.clone()),
            search: SearchService::new(client.clone()),
            client,
        })
    }

    /// The underlying client, for callers that need raw access.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}
