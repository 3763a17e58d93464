//! Unpaid Period Model

use serde::{Deserialize, Serialize};

use crate::types::Period;

/// Projection of one current or future billing period for a family
///
/// Ephemeral: recomputed server-side on every fetch, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnpaidPeriod {
    pub period: Period,
    /// Amount before discounts
    pub original_amount: f64,
    /// Amount after the family's recurring discount
    pub net_amount: f64,
    #[serde(default)]
    pub is_overdue: bool,
}
