use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{ApiConfig, DedupConfig};
use crate::domain::{ApiError, ApiResponse, TokenPair};
use crate::infrastructure::auth::{peek_claims, TokenStore};
use crate::infrastructure::dedup::{build_key, RequestCache};

/// Empty query list, for endpoints that take no parameters.
pub const NO_QUERY: &[(&str, String)] = &[];

/// Endpoints that are reachable without a session. A 401 from one of these
/// is an ordinary answer and must not trigger a refresh or end the session.
const PUBLIC_ENDPOINTS: &[&str] = &[
    "/auth/decode-token",
    "/users/",
    "/items/",
    "/search/",
    "/auth/login",
    "/auth/register",
    "/auth/refresh",
];

fn is_public_endpoint(path: &str) -> bool {
    PUBLIC_ENDPOINTS
        .iter()
        .any(|endpoint| path.contains(endpoint))
}

#[derive(Debug)]
struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    tokens: Arc<dyn TokenStore>,
    inflight: RequestCache<Value>,
}

/// HTTP client shared by every backend service.
///
/// Adds the tenant `app_id` header, a per-request `x-request-id`, and the
/// bearer token when a session exists. GETs routed through
/// [`ApiClient::get_deduped`] collapse concurrent identical calls into one
/// upstream request. A 401 on a protected endpoint triggers a single
/// refresh-and-retry; refresh failure propagates the original 401 without
/// clearing the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    pub fn new(
        api: &ApiConfig,
        dedup: &DedupConfig,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = api.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: api.base_url.trim_end_matches('/').to_string(),
                app_id: api.app_id.clone(),
                tokens,
                inflight: RequestCache::new(dedup.inflight_ttl()),
            }),
        })
    }

    /// The token store this client injects bearer tokens from.
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.inner.tokens)
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        self.execute(Method::GET, path, query, None).await
    }

    /// GET with in-flight deduplication: concurrent calls for the same
    /// path and parameters share one upstream request.
    pub async fn get_deduped(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        let key = build_key(path, query);
        let client = self.clone();
        let owned_path = path.to_string();
        let owned_query: Vec<(String, String)> = query
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();

        self.inner
            .inflight
            .get_or_create(&key, move || async move {
                let query: Vec<(&str, String)> = owned_query
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.clone()))
                    .collect();
                client.execute(Method::GET, &owned_path, &query, None).await
            })
            .await
    }

    pub async fn post(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        self.execute(Method::POST, path, query, body).await
    }

    pub async fn put(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        self.execute(Method::PUT, path, query, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.execute(Method::DELETE, path, NO_QUERY, None).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let response = self
            .send(
                method.clone(),
                path,
                query,
                body.as_ref(),
                self.inner.tokens.access_token(),
            )
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED && !is_public_endpoint(path) {
            warn!(path, "401 on protected endpoint, attempting token refresh");
            if let Some(tokens) = self.try_refresh().await {
                let retry = self
                    .send(method, path, query, body.as_ref(), Some(tokens.access_token))
                    .await?;
                return Self::interpret(retry).await;
            }
            // Refresh was not possible; the original 401 stands. The
            // session is left intact, the caller decides what to do.
        }

        Self::interpret(response).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        bearer: Option<String>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        let mut request = self
            .inner
            .http
            .request(method, &url)
            .header("app_id", &self.inner.app_id)
            .header("x-request-id", uuid::Uuid::new_v4().to_string());

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("Request to {url} failed: {e}")))
    }

    /// Reads the response body, mapping non-2xx statuses to
    /// [`ApiError::Http`] with the backend's own message when one is
    /// present in the body.
    async fn interpret(response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            // Prefer the backend's own message when the body carries one.
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .as_ref()
                .and_then(|b| {
                    b.get("message")
                        .or_else(|| b.get("error"))
                        .or_else(|| b.get("detail"))
                })
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(text);
            return Err(ApiError::http(status.as_u16(), message));
        }

        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ApiError::decode(format!("Response body is not JSON: {e}")))
    }

    /// One refresh attempt: needs both stored tokens and a user id peeked
    /// from the access token (display-only introspection; the auth backend
    /// re-validates everything server side).
    async fn try_refresh(&self) -> Option<TokenPair> {
        let refresh_token = self.inner.tokens.refresh_token()?;
        let access_token = self.inner.tokens.access_token()?;

        let user_id = match peek_claims(&access_token) {
            Ok(claims) => claims.subject().map(str::to_string),
            Err(e) => {
                warn!("could not peek user id from access token: {e}");
                None
            }
        }?;

        let body = serde_json::json!({
            "user_id": user_id,
            "refresh_token": refresh_token,
        });

        let response = self
            .send(
                Method::POST,
                "/auth/refresh",
                NO_QUERY,
                Some(&body),
                Some(access_token),
            )
            .await
            .ok()?;
        let value = Self::interpret(response).await.ok()?;

        let envelope: ApiResponse<TokenPair> = serde_json::from_value(value).ok()?;
        if !envelope.is_ok() {
            warn!(status = envelope.status_code, "token refresh rejected");
            return None;
        }

        let pair = envelope.data?;
        self.inner.tokens.store(pair.clone());
        debug!("token refresh succeeded, retrying original request");
        Some(pair)
    }
}
