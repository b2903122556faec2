use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::domain::auth::{
    GoogleLoginRequest, LoginRequest, RegisterRequest, TokenDecodeRequest, TokenRefreshRequest,
};
use crate::domain::{ApiError, ApiResponse, TokenClaims, TokenPair};
use crate::infrastructure::auth::TokenStore;
use crate::infrastructure::http::{ApiClient, NO_QUERY};

/// Client for the auth backend. Successful logins and refreshes store the
/// issued token pair so subsequent requests carry it.
#[derive(Debug)]
pub struct AuthService {
    client: ApiClient,
    tokens: Arc<dyn TokenStore>,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        let tokens = client.token_store();
        Self { client, tokens }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let pair = self
            .post_for_tokens("/auth/login", serde_json::to_value(&request)?)
            .await?;
        debug!("login succeeded, session established");
        Ok(pair)
    }

    pub async fn login_with_google(&self, id_token: &str) -> Result<TokenPair, ApiError> {
        let request = GoogleLoginRequest {
            id_token: id_token.to_string(),
        };
        self.post_for_tokens("/auth/login/google", serde_json::to_value(&request)?)
            .await
    }

    /// Registers a new account. The created profile is returned as the
    /// backend sent it; registering does not establish a session.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Value, ApiError> {
        validator::Validate::validate(request)?;
        let value = self
            .client
            .post("/auth/register", NO_QUERY, Some(serde_json::to_value(request)?))
            .await?;
        let envelope: ApiResponse<Value> = serde_json::from_value(value)?;
        envelope.require_data()
    }

    pub async fn refresh(&self, user_id: &str, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let request = TokenRefreshRequest {
            user_id: user_id.to_string(),
            refresh_token: refresh_token.to_string(),
        };
        self.post_for_tokens("/auth/refresh", serde_json::to_value(&request)?)
            .await
    }

    /// Asks the auth backend to decode a token. Unlike
    /// [`peek_claims`](crate::infrastructure::auth::peek_claims), the
    /// backend verifies the signature before answering.
    pub async fn decode_token(&self, token: &str) -> Result<TokenClaims, ApiError> {
        let request = TokenDecodeRequest {
            token: token.to_string(),
        };
        let value = self
            .client
            .post(
                "/auth/decode-token",
                NO_QUERY,
                Some(serde_json::to_value(&request)?),
            )
            .await?;
        let envelope: ApiResponse<TokenClaims> = serde_json::from_value(value)?;
        envelope.require_data()
    }

    /// Ends the session server side, then drops the stored tokens.
    pub async fn logout(&self, user_id: &str) -> Result<(), ApiError> {
        self.client
            .post(
                "/auth/logout",
                &[("user_id", user_id.to_string())],
                None,
            )
            .await?;
        self.tokens.clear();
        debug!("session cleared");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.access_token().is_some()
    }

    pub fn current_token(&self) -> Option<String> {
        self.tokens.access_token()
    }

    async fn post_for_tokens(&self, path: &str, body: Value) -> Result<TokenPair, ApiError> {
        let value = self.client.post(path, NO_QUERY, Some(body)).await?;
        let envelope: ApiResponse<TokenPair> = serde_json::from_value(value)?;
        let pair = envelope.require_data()?;
        self.tokens.store(pair.clone());
        Ok(pair)
    }
}
