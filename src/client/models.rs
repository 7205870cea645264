//! Wire models for the work-order endpoints

use serde::{Deserialize, Serialize};

/// Value of `ApiResponse::status` that marks success
pub const SUCCESS_STATUS: &str = "success";

/// Body of `POST /clock-in`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockInRequest {
    pub work_order_collection_id: i32,
    pub user_id: i32,
    pub quantity: i32,
}

/// Body of `POST /clock-out`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockOutRequest {
    pub work_order_collection_id: i32,
    pub user_id: i32,
    pub quantity: i32,
    pub status: ClockOutStatus,
}

/// Whether the operator finished the work order when clocking out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockOutStatus {
    Complete,
    Incomplete,
}

impl ClockOutStatus {
    #[allow(dead_code)]
    pub fn is_complete(self) -> bool {
        matches!(self, ClockOutStatus::Complete)
    }
}

impl std::fmt::Display for ClockOutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockOutStatus::Complete => write!(f, "Complete"),
            ClockOutStatus::Incomplete => write!(f, "Incomplete"),
        }
    }
}

/// Response envelope shared by both endpoints.
///
/// Missing fields decode as empty strings so that partial bodies can
/// still be classified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub message: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}
