//! Rutero Client - console core for the school-transport billing service
//!
//! The pieces behind the payment-management views of the admin console:
//! a TTL-bound history cache, an optimistic mutation coordinator, the
//! retroactive-apply scope resolver and the dialog workflow built on top
//! of them. The remote payment service stays the ledger of record; this
//! crate mirrors its figures and decides when and with what scope to ask
//! it to recompute.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod ledger;
pub mod mutation;
pub mod retroactive;
pub mod scope;
pub mod summary;

pub use api::{PaymentApi, RestPaymentApi};
pub use cache::{history_key, owner_prefix, HistoryCache};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use ledger::LedgerStore;
pub use mutation::{MutationCoordinator, MutationOutcome};
pub use retroactive::{current_period, Notice, RetroMode, RetroStage, RetroactiveFlow, Severity};
pub use scope::{resolve_scope, RetroOption, ValidationError};
pub use summary::total_due;

// Re-export shared types for convenience
pub use shared::models::{FinalStatus, HistoryEntry, PaymentRecord, UnpaidPeriod};
pub use shared::response::{AdjustmentSummary, HistoryPage};
pub use shared::scope::RetroScope;
pub use shared::types::Period;
