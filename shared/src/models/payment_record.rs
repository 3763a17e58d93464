//! Payment Record Model

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Billing status of a family account (estado final)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FinalStatus {
    Pagado,
    Pendiente,
    Mora,
    Inactivo,
    Eliminado,
}

/// One family's recurring transport billing account
///
/// The `outstanding` base amount went through several names on the
/// backend over time; the aliases normalize them once, here at the
/// deserialization boundary, so consumers only ever see one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: String,
    pub school_id: String,
    pub user_id: String,
    /// Monthly fee (tarifa)
    #[serde(default)]
    pub tariff: f64,
    /// Outstanding base amount for the current period, when reported
    #[serde(
        default,
        alias = "leftover",
        alias = "leftOver",
        alias = "totalDue",
        alias = "amountDue",
        skip_serializing_if = "Option::is_none"
    )]
    pub outstanding: Option<f64>,
    /// Accumulated late penalty (mora)
    #[serde(default)]
    pub accumulated_penalty: f64,
    #[serde(default)]
    pub credit_balance: f64,
    /// Recurring family discount (beca)
    #[serde(default)]
    pub family_special_fee: f64,
    pub final_status: FinalStatus,
    /// Set while penalty accrual is frozen for this family
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_frozen_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,
}

impl PaymentRecord {
    /// Logically deleted records are immutable; every mutation guards on this.
    pub fn is_deleted(&self) -> bool {
        self.final_status == FinalStatus::Eliminado
    }

    pub fn is_suspended(&self) -> bool {
        self.final_status == FinalStatus::Inactivo
    }

    pub fn penalty_frozen(&self) -> bool {
        self.penalty_frozen_at.is_some()
    }
}
