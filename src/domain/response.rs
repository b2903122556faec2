use serde::{Deserialize, Serialize};

use crate::domain::ApiError;

/// Response envelope used by the auth, items and user backends.
///
/// Every enveloped endpoint answers `{ status_code, message, data }`; the
/// search backend is the exception and returns raw JSON bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Whether the backend reported success in the envelope.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Unwraps `data`, turning an unsuccessful or empty envelope into the
    /// backend's own status and message.
    pub fn require_data(self) -> Result<T, ApiError> {
        if !self.is_ok() {
            return Err(ApiError::http(self.status_code, self.message));
        }

        self.data
            .ok_or_else(|| ApiError::http(self.status_code, "Response envelope carried no data"))
    }
}
