//! Work-order clock-in / clock-out client

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde::Serialize;

use super::WorkOrdersApi;
use super::http::ClientFactory;
use super::models::{ApiResponse, ClockInRequest, ClockOutRequest, ClockOutStatus};
use crate::error::{ApiError, Result};

/// Fallback when an error response carries nothing readable
const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    ClockIn,
    ClockOut,
}

impl Operation {
    fn path(self) -> &'static str {
        match self {
            Operation::ClockIn => "clock-in",
            Operation::ClockOut => "clock-out",
        }
    }

    fn rejection_message(self) -> &'static str {
        match self {
            Operation::ClockIn => "Clock-in was not accepted by the server",
            Operation::ClockOut => "Clock-out was not accepted by the server",
        }
    }
}

/// Client for the work-order endpoints
pub struct WorkOrdersClient {
    factory: Arc<ClientFactory>,
}

impl WorkOrdersClient {
    pub fn new(factory: Arc<ClientFactory>) -> Self {
        Self { factory }
    }

    #[allow(dead_code)]
    pub fn factory(&self) -> &Arc<ClientFactory> {
        &self.factory
    }

    async fn submit<B>(&self, operation: Operation, body: &B) -> Result<ApiResponse>
    where
        B: Serialize + Sync,
    {
        let client = self.factory.client().await?;
        let response = client.post_json(operation.path(), body).await?;

        let status = response.status();
        let text = response.text().await.map_err(ApiError::from)?;
        debug!("{} answered {} ({} bytes)", operation.path(), status, text.len());

        interpret(operation, status, &text)
    }
}

#[async_trait]
impl WorkOrdersApi for WorkOrdersClient {
    async fn clock_in(
        &self,
        work_order_collection_id: i32,
        user_id: i32,
        quantity: i32,
    ) -> Result<ApiResponse> {
        let request = ClockInRequest {
            work_order_collection_id,
            user_id,
            quantity,
        };
        self.submit(Operation::ClockIn, &request).await
    }

    async fn clock_out(
        &self,
        work_order_collection_id: i32,
        user_id: i32,
        quantity: i32,
        status: ClockOutStatus,
    ) -> Result<ApiResponse> {
        let request = ClockOutRequest {
            work_order_collection_id,
            user_id,
            quantity,
            status,
        };
        self.submit(Operation::ClockOut, &request).await
    }
}

/// Classify a completed HTTP exchange
fn interpret(operation: Operation, status: StatusCode, body: &str) -> Result<ApiResponse> {
    if !status.is_success() {
        return Err(ApiError::Http {
            status,
            message: error_message(body),
        }
        .into());
    }

    let parsed: ApiResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) => return Err(ApiError::EmptyResponse.into()),
    };

    if !parsed.is_success() {
        let message = if parsed.message.trim().is_empty() {
            operation.rejection_message().to_string()
        } else {
            parsed.message
        };
        return Err(ApiError::Rejected(message).into());
    }

    Ok(parsed)
}

/// Best human-readable message from an error body
fn error_message(body: &str) -> String {
    if body.trim().is_empty() {
        return UNKNOWN_ERROR.to_string();
    }

    serde_json::from_str::<ApiResponse>(body)
        .ok()
        .map(|parsed| parsed.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| body.to_string())
}
