//! Mock work-orders client for testing
//!
//! Provides a mock implementation of [`WorkOrdersApi`] for unit testing
//! command handlers without making real API calls.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::WorkOrdersApi;
use super::models::{ApiResponse, ClockInRequest, ClockOutRequest, ClockOutStatus};
use crate::error::{ApiError, Result};

/// A captured API request for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedRequest {
    ClockIn(ClockInRequest),
    ClockOut(ClockOutRequest),
}

/// Mock API client for testing.
///
/// Configure the response via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockWorkOrdersClient::new().with_error(ApiError::EmptyResponse).await;
/// assert!(mock.clock_in(1, 2, 3).await.is_err());
/// ```
#[derive(Default)]
pub struct MockWorkOrdersClient {
    /// Response returned on success; defaults to `{status: "success"}`
    response: Arc<Mutex<Option<ApiResponse>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Captured requests for test assertions
    captured_requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockWorkOrdersClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the response body returned by successful calls.
    pub async fn with_response(self, response: ApiResponse) -> Self {
        *self.response.lock().await = Some(response);
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Get all captured requests for test assertions.
    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.captured_requests.lock().await.clone()
    }

    async fn respond(&self, request: CapturedRequest) -> Result<ApiResponse> {
        self.captured_requests.lock().await.push(request);

        if let Some(e) = self.error.lock().await.take() {
            return Err(e.into());
        }

        Ok(self
            .response
            .lock()
            .await
            .clone()
            .unwrap_or_else(|| ApiResponse {
                status: "success".to_string(),
                message: String::new(),
            }))
    }
}

#[async_trait]
impl WorkOrdersApi for MockWorkOrdersClient {
    async fn clock_in(
        &self,
        work_order_collection_id: i32,
        user_id: i32,
        quantity: i32,
    ) -> Result<ApiResponse> {
        self.respond(CapturedRequest::ClockIn(ClockInRequest {
            work_order_collection_id,
            user_id,
            quantity,
        }))
        .await
    }

    async fn clock_out(
        &self,
        work_order_collection_id: i32,
        user_id: i32,
        quantity: i32,
        status: ClockOutStatus,
    ) -> Result<ApiResponse> {
        self.respond(CapturedRequest::ClockOut(ClockOutRequest {
            work_order_collection_id,
            user_id,
            quantity,
            status,
        }))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_defaults_to_success() {
        let mock = MockWorkOrdersClient::new();
        let response = mock.clock_in(1, 2, 3).await.unwrap();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_mock_error_is_consumed_once() {
        let mock = MockWorkOrdersClient::new()
            .with_error(ApiError::Rejected("nope".to_string()))
            .await;

        assert!(mock.clock_out(1, 2, 3, ClockOutStatus::Complete).await.is_err());
        assert!(mock.clock_out(1, 2, 3, ClockOutStatus::Complete).await.is_ok());
        assert_eq!(mock.captured_requests().await.len(), 2);
    }
}
