use crate::domain::user::{CreateUserRequest, UpdateUserRequest};
use crate::domain::{ApiError, ApiResponse, User, UserPage};
use crate::infrastructure::http::{ApiClient, NO_QUERY};

/// Client for the user directory.
#[derive(Debug, Clone)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, user_id: &str) -> Result<User, ApiError> {
        let value = self.client.get(&format!("/users/{user_id}"), NO_QUERY).await?;
        let envelope: ApiResponse<User> = serde_json::from_value(value)?;
        envelope.require_data()
    }

    pub async fn list(&self, page_number: u32, page_size: u32) -> Result<UserPage, ApiError> {
        let query = [
            ("page_number", page_number.to_string()),
            ("page_size", page_size.to_string()),
        ];
        let value = self.client.get("/users", &query).await?;
        let envelope: ApiResponse<UserPage> = serde_json::from_value(value)?;
        envelope.require_data()
    }

    pub async fn create(&self, request: &CreateUserRequest) -> Result<User, ApiError> {
        validator::Validate::validate(request)?;
        let value = self
            .client
            .post("/users", NO_QUERY, Some(serde_json::to_value(request)?))
            .await?;
        let envelope: ApiResponse<User> = serde_json::from_value(value)?;
        envelope.require_data()
    }

    pub async fn update(
        &self,
        user_id: &str,
        request: &UpdateUserRequest,
    ) -> Result<User, ApiError> {
        validator::Validate::validate(request)?;
        let value = self
            .client
            .put(
                &format!("/users/{user_id}"),
                NO_QUERY,
                Some(serde_json::to_value(request)?),
            )
            .await?;
        let envelope: ApiResponse<User> = serde_json::from_value(value)?;
        envelope.require_data()
    }

    pub async fn activate(&self, user_id: &str) -> Result<(), ApiError> {
        self.client
            .put(&format!("/users/{user_id}/activate"), NO_QUERY, None)
            .await?;
        Ok(())
    }

    pub async fn deactivate(&self, user_id: &str) -> Result<(), ApiError> {
        self.client
            .put(&format!("/users/{user_id}/deactivate"), NO_QUERY, None)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, user_id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/users/{user_id}")).await?;
        Ok(())
    }
}
