//! Data models
//!
//! Mirrored from the payment service API. The service owns every record;
//! the console holds read-mostly copies plus a few optimistic fields.
//! All IDs are opaque server-originated strings.

pub mod history_entry;
pub mod payment_record;
pub mod unpaid_period;

// Re-exports
pub use history_entry::*;
pub use payment_record::*;
pub use unpaid_period::*;
