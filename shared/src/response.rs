//! API response types
//!
//! Every payment-service endpoint answers with the same envelope.

use serde::{Deserialize, Serialize};

use crate::models::{HistoryEntry, PaymentRecord};

/// Standard API response code
pub const API_CODE_SUCCESS: &str = "E0000";

/// Unified API response structure
///
/// ```json
/// {
///     "code": "E0000",
///     "message": "Success",
///     "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response code (E0000 = success, others = error codes)
    pub code: String,
    /// Human-readable message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Request trace ID for debugging (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            code: API_CODE_SUCCESS.to_string(),
            message: "Success".to_string(),
            data: Some(data),
            trace_id: None,
        }
    }

    /// Create an error response
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
            trace_id: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == API_CODE_SUCCESS
    }

    /// Envelope -> payload, surfacing the error code and message
    pub fn into_result(self) -> Result<Option<T>, (String, String)> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err((self.code, self.message))
        }
    }
}

/// One page of a family's transaction history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub entries: Vec<HistoryEntry>,
    /// Total entries across all pages
    pub total: u64,
}

/// Server echo after a retroactive family adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentSummary {
    /// How many billing periods the adjustment touched
    pub affected_periods: u32,
    /// Refreshed record, when the service echoes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<PaymentRecord>,
}
