use std::fmt::Debug;
use std::sync::RwLock;

use crate::domain::TokenPair;

/// Holds the session's token pair. The browser original kept these in
/// localStorage; here the store is an injected component so the client and
/// the auth service share one session.
pub trait TokenStore: Send + Sync + Debug {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    fn store(&self, tokens: TokenPair);
    fn clear(&self);
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.tokens
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|pair| pair.access_token.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.tokens
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|pair| pair.refresh_token.clone())
    }

    fn store(&self, tokens: TokenPair) {
        *self.tokens.write().unwrap_or_else(|e| e.into_inner()) = Some(tokens);
    }

    fn clear(&self) {
        *self.tokens.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
