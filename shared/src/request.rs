//! Mutation request payloads sent to the payment service

use serde::{Deserialize, Serialize};

use crate::scope::RetroScope;

/// Apply a recurring family discount over a scope of billing periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyDiscountRequest {
    pub special_fee: f64,
    #[serde(flatten)]
    pub scope: RetroScope,
}

/// Change the family's route type over a scope of billing periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRouteTypeRequest {
    pub route_type: String,
    #[serde(flatten)]
    pub scope: RetroScope,
}

/// Toggle the invoice-sent flag on one history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetInvoiceSentRequest {
    pub invoice_sent: bool,
}

/// Suspend or reactivate the family account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetUserStateRequest {
    pub suspended: bool,
}

/// Freeze or resume penalty accrual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPenaltyFrozenRequest {
    pub frozen: bool,
}

/// Waive part of the accumulated penalty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExoneratePenaltyRequest {
    pub amount: f64,
}

/// Update the record's receipt number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReceiptRequest {
    pub receipt_number: String,
}

/// Update the record's free-form notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotesRequest {
    pub notes: String,
}
