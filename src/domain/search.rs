use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tuning knobs for a search call. `k` bounds the candidate set; the page
/// fields are optional and only sent when set.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub k: u32,
    pub page_index: Option<u32>,
    pub page_size: Option<u32>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            k: 10,
            page_index: None,
            page_size: None,
        }
    }
}

impl SearchOptions {
    pub fn with_k(mut self, k: u32) -> Self {
        self.k = k;
        self
    }

    pub fn with_page(mut self, page_index: u32, page_size: u32) -> Self {
        self.page_index = Some(page_index);
        self.page_size = Some(page_size);
        self
    }
}

/// Paging block the search backend attaches when paging was requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPagination {
    pub page_index: u32,
    pub page_size: u32,
    pub total_results: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Results for a single scope (items or authors).
///
/// Hits are ranked documents owned by the search backend and are passed
/// through as raw JSON rather than re-modeled here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopedResults {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub normalized_query: Option<String>,
    #[serde(default)]
    pub pagination: Option<SearchPagination>,
    #[serde(default)]
    pub search_type: Option<String>,
}

/// Combined response from the unscoped `/search` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedResults {
    pub item: ScopedResults,
    pub author: ScopedResults,
}
