use crate::domain::{ApiError, CombinedResults, ScopedResults, SearchOptions};
use crate::infrastructure::http::ApiClient;

/// Client for the search backend.
///
/// Search responses are raw JSON bodies, not the `{status_code, message,
/// data}` envelope the other backends use.
#[derive(Debug, Clone)]
pub struct SearchService {
    client: ApiClient,
}

impl SearchService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Searches items and authors together.
    pub async fn search_all(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<CombinedResults, ApiError> {
        let value = self
            .client
            .get("/search", &Self::query_params(query, options))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn search_items(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<ScopedResults, ApiError> {
        let value = self
            .client
            .get("/search/items", &Self::query_params(query, options))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn search_authors(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<ScopedResults, ApiError> {
        let value = self
            .client
            .get("/search/authors", &Self::query_params(query, options))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    fn query_params(query: &str, options: &SearchOptions) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", query.to_string()), ("k", options.k.to_string())];
        if let Some(page_index) = options.page_index {
            params.push(("page_index", page_index.to_string()));
        }
        if let Some(page_size) = options.page_size {
            params.push(("page_size", page_size.to_string()));
        }
        params
    }
}
