//! Retroactive-apply scope protocol
//!
//! A family-level adjustment (discount or route-type change) is applied
//! over a declarative scope of billing periods. Exactly one of the four
//! shapes goes on the wire; `periods` travels only with `SELECTED`.

use serde::{Deserialize, Serialize};

use crate::types::Period;

/// Wire-level scope of a retroactive family adjustment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope")]
pub enum RetroScope {
    /// Only the current billing period
    ///
    /// Narrower than a one-element `SELECTED` list; the service applies a
    /// simpler, less invalidation-heavy path for it. Whether the backend
    /// truly requires the distinction or merely accepts it is a pending
    /// contract question; the shape is kept for compatibility.
    #[serde(rename = "CURRENT")]
    Current,
    /// An explicit set of billing periods
    #[serde(rename = "SELECTED")]
    Selected { periods: Vec<Period> },
    /// Every pending period; the service enumerates them itself
    #[serde(rename = "ALL_PENDING")]
    AllPending,
    /// From the next billing period onward
    #[serde(rename = "NEXT_FROM")]
    NextFrom,
}
