use serde_json::Value;

use crate::domain::item::{CreateItemRequest, UpdateItemRequest};
use crate::domain::{ApiError, ApiResponse, ItemDetail, ItemPage};
use crate::infrastructure::http::{ApiClient, NO_QUERY};

fn paging(page_number: u32, page_size: u32) -> Vec<(&'static str, String)> {
    vec![
        ("page_number", page_number.to_string()),
        ("page_size", page_size.to_string()),
    ]
}

/// Client for the content backend.
///
/// All reads go through the deduplicating GET path: a page fetched twice
/// concurrently (a double-fired refresh, two views of the same list) costs
/// one upstream request. Writes are never deduplicated.
#[derive(Debug, Clone)]
pub struct ItemService {
    client: ApiClient,
}

impl ItemService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, page_number: u32, page_size: u32) -> Result<ItemPage, ApiError> {
        let value = self
            .client
            .get_deduped("/items", &paging(page_number, page_size))
            .await?;
        Self::unwrap_page(value)
    }

    pub async fn get(&self, item_id: &str) -> Result<ItemDetail, ApiError> {
        let value = self
            .client
            .get_deduped(&format!("/items/{item_id}"), NO_QUERY)
            .await?;
        let envelope: ApiResponse<ItemDetail> = serde_json::from_value(value)?;
        envelope.require_data()
    }

    pub async fn by_author(
        &self,
        author_id: &str,
        page_number: u32,
        page_size: u32,
    ) -> Result<ItemPage, ApiError> {
        let value = self
            .client
            .get_deduped(
                &format!("/items/author/{author_id}"),
                &paging(page_number, page_size),
            )
            .await?;
        Self::unwrap_page(value)
    }

    pub async fn by_category(
        &self,
        category: &str,
        page_number: u32,
        page_size: u32,
    ) -> Result<ItemPage, ApiError> {
        let value = self
            .client
            .get_deduped(
                &format!("/items/category/{category}"),
                &paging(page_number, page_size),
            )
            .await?;
        Self::unwrap_page(value)
    }

    pub async fn create(&self, request: &CreateItemRequest) -> Result<ItemDetail, ApiError> {
        validator::Validate::validate(request)?;
        let value = self
            .client
            .post("/items", NO_QUERY, Some(serde_json::to_value(request)?))
            .await?;
        let envelope: ApiResponse<ItemDetail> = serde_json::from_value(value)?;
        envelope.require_data()
    }

    pub async fn update(
        &self,
        item_id: &str,
        request: &UpdateItemRequest,
    ) -> Result<ItemDetail, ApiError> {
        validator::Validate::validate(request)?;
        let value = self
            .client
            .put(
                &format!("/items/{item_id}"),
                NO_QUERY,
                Some(serde_json::to_value(request)?),
            )
            .await?;
        let envelope: ApiResponse<ItemDetail> = serde_json::from_value(value)?;
        envelope.require_data()
    }

    pub async fn delete(&self, item_id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/items/{item_id}")).await?;
        Ok(())
    }

    /// Bumps the item's view counter. Fire-and-forget on the UI side, so
    /// only failures are interesting.
    pub async fn record_view(&self, item_id: &str) -> Result<(), ApiError> {
        self.client
            .post(&format!("/items/{item_id}/view"), NO_QUERY, None)
            .await?;
        Ok(())
    }

    fn unwrap_page(value: Value) -> Result<ItemPage, ApiError> {
        let envelope: ApiResponse<ItemPage> = serde_json::from_value(value)?;
        envelope.require_data()
    }
}
