//! Retroactive scope resolution
//!
//! Maps the user's dialog choice (option, period checkboxes, select-all)
//! onto exactly one wire scope, or fails closed with a validation error.
//! Runs before anything touches the network.

use thiserror::Error;

use shared::scope::RetroScope;
use shared::types::Period;

/// Validation failures raised before any network call
///
/// Surfaced as user-visible warnings, never logged as system faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No application option selected")]
    MissingOption,

    #[error("No billing periods selected")]
    NoPeriodsSelected,

    #[error("Discount must be a non-negative amount")]
    InvalidDiscount,

    #[error("Route type must not be empty")]
    MissingRouteType,

    #[error("Exoneration amount must be positive")]
    InvalidExoneration,
}

/// Dialog-level application option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetroOption {
    /// Apply to the current and/or explicitly chosen pending periods
    CurrentOrPending,
    /// Apply from the next billing period onward
    Next,
}

/// Resolve the user's selection into a single wire scope.
///
/// `Next` needs no period data at all. For `CurrentOrPending`, select-all
/// wins over the explicit list (the server enumerates pending periods
/// itself), and a selection of exactly the current period collapses to
/// the narrower `CURRENT` scope.
pub fn resolve_scope(
    option: Option<RetroOption>,
    selected: &[Period],
    select_all: bool,
    current: &Period,
) -> Result<RetroScope, ValidationError> {
    let option = option.ok_or(ValidationError::MissingOption)?;

    if option == RetroOption::Next {
        return Ok(RetroScope::NextFrom);
    }

    if !select_all && selected.is_empty() {
        return Err(ValidationError::NoPeriodsSelected);
    }
    if select_all {
        return Ok(RetroScope::AllPending);
    }
    if selected.len() == 1 && selected[0] == *current {
        return Ok(RetroScope::Current);
    }
    Ok(RetroScope::Selected {
        periods: selected.to_vec(),
    })
}

/// Effective discount for DISCOUNT mode: the typed value wins, the
/// family's configured discount is the fallback. Fails closed.
pub fn resolve_discount(
    typed: Option<f64>,
    configured: Option<f64>,
) -> Result<f64, ValidationError> {
    let fee = typed.or(configured).ok_or(ValidationError::InvalidDiscount)?;
    if !fee.is_finite() || fee < 0.0 {
        return Err(ValidationError::InvalidDiscount);
    }
    Ok(fee)
}

/// Route type for ROUTE_TYPE mode: trimmed, non-empty. Fails closed.
pub fn resolve_route_type(input: Option<&str>) -> Result<String, ValidationError> {
    match input.map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(ValidationError::MissingRouteType),
    }
}

/// Exoneration amounts must be strictly positive.
pub fn validate_exoneration(amount: f64) -> Result<f64, ValidationError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::InvalidExoneration);
    }
    Ok(amount)
}
