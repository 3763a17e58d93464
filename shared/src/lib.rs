//! Shared types for the Rutero billing console
//!
//! Domain models and wire types used across the console crates:
//! payment records, ledger history, billing periods and the
//! retroactive-apply scope protocol.

pub mod models;
pub mod request;
pub mod response;
pub mod scope;
pub mod types;

// Re-exports
pub use models::{EntryKind, EntrySource, FinalStatus, HistoryEntry, PaymentRecord, UnpaidPeriod};
pub use response::{AdjustmentSummary, ApiResponse, HistoryPage, API_CODE_SUCCESS};
pub use scope::RetroScope;
pub use types::{Period, PeriodParseError, Timestamp};
