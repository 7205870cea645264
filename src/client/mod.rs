//! Work-order API client

use async_trait::async_trait;

use crate::error::Result;

pub mod http;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod work_orders;

#[allow(unused_imports)]
pub use http::{AuthenticatedClient, ClientFactory};
#[cfg(test)]
pub use mock::MockWorkOrdersClient;
pub use models::{ApiResponse, ClockOutStatus};
pub use work_orders::WorkOrdersClient;

/// Work-order operations exposed to the terminal
#[async_trait]
pub trait WorkOrdersApi: Send + Sync {
    /// Start work on a work-order collection
    async fn clock_in(
        &self,
        work_order_collection_id: i32,
        user_id: i32,
        quantity: i32,
    ) -> Result<ApiResponse>;

    /// Stop work on a work-order collection
    async fn clock_out(
        &self,
        work_order_collection_id: i32,
        user_id: i32,
        quantity: i32,
        status: ClockOutStatus,
    ) -> Result<ApiResponse>;
}
