//! History Entry Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What a ledger line charges or credits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    /// Regular monthly fee
    Tarifa,
    /// Late penalty
    Mora,
    /// Credit applied to the account
    Credito,
    /// Extraordinary event charge
    Evento,
}

/// How a ledger line was originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntrySource {
    Manual,
    AutoDebit,
    CreditAuto,
    FullDiscount,
}

/// One immutable ledger line of a payment record
///
/// Created server-side on every payment or adjustment event. The console
/// never originates entries; the only field it writes is `invoice_sent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub payment_id: String,
    pub real_payment_date: NaiveDate,
    pub amount: f64,
    pub kind: EntryKind,
    pub source: EntrySource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,
    #[serde(default)]
    pub invoice_sent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraordinary_discount: Option<f64>,
}
