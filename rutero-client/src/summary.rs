//! Total-due computation using rust_decimal for precision
//!
//! Arithmetic runs on `Decimal` internally and converts back to `f64`
//! at the boundary. The calculator only reconciles figures the service
//! already computed; it never accrues penalties or discounts itself.

use rust_decimal::prelude::*;

use shared::models::PaymentRecord;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
///
/// Non-finite values silently convert to 0.
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Total due for a payment record, given the extraordinary discount typed
/// in the payment dialog.
///
/// Formula: `max(0, base + accumulated_penalty - credit_balance
///                   - extra_discount - family_special_fee)`
///
/// where `base` is the outstanding amount when the service reported one,
/// falling back to the monthly tariff. Recomputed on every keystroke of
/// the amount and discount fields, so it must stay pure and idempotent.
pub fn total_due(record: &PaymentRecord, extra_discount: f64) -> f64 {
    let base = to_decimal(record.outstanding.unwrap_or(record.tariff));
    let total = base + to_decimal(record.accumulated_penalty)
        - to_decimal(record.credit_balance)
        - to_decimal(extra_discount)
        - to_decimal(record.family_special_fee);
    to_f64(total.max(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::FinalStatus;

    fn record(tariff: f64, penalty: f64, credit: f64, special: f64) -> PaymentRecord {
        PaymentRecord {
            id: "pay-1".to_string(),
            school_id: "sch-1".to_string(),
            user_id: "usr-1".to_string(),
            tariff,
            outstanding: None,
            accumulated_penalty: penalty,
            credit_balance: credit,
            family_special_fee: special,
            final_status: FinalStatus::Pendiente,
            penalty_frozen_at: None,
            route_type: None,
            notes: None,
            receipt_number: None,
        }
    }

    #[test]
    fn test_total_due_formula() {
        // 500 + 50 - 20 - 10 - 30 = 490
        let r = record(500.0, 50.0, 20.0, 30.0);
        assert_eq!(total_due(&r, 10.0), 490.0);
    }

    #[test]
    fn test_outstanding_takes_precedence_over_tariff() {
        let mut r = record(500.0, 0.0, 0.0, 0.0);
        r.outstanding = Some(320.0);
        assert_eq!(total_due(&r, 0.0), 320.0);
    }

    #[test]
    fn test_negative_result_clamps_to_zero() {
        let r = record(100.0, 0.0, 500.0, 0.0);
        assert_eq!(total_due(&r, 0.0), 0.0);

        let r = record(100.0, 0.0, 0.0, 60.0);
        assert_eq!(total_due(&r, 60.0), 0.0);
    }

    #[test]
    fn test_zero_inputs() {
        let r = record(0.0, 0.0, 0.0, 0.0);
        assert_eq!(total_due(&r, 0.0), 0.0);
    }

    #[test]
    fn test_non_finite_inputs_coerce_to_zero() {
        let mut r = record(f64::NAN, 50.0, 0.0, 0.0);
        assert_eq!(total_due(&r, 0.0), 50.0);

        r = record(500.0, 0.0, 0.0, 0.0);
        assert_eq!(total_due(&r, f64::INFINITY), 500.0);
    }

    #[test]
    fn test_idempotent_per_keystroke() {
        let r = record(500.0, 12.5, 7.25, 30.0);
        let first = total_due(&r, 10.0);
        for _ in 0..100 {
            assert_eq!(total_due(&r, 10.0), first);
        }
    }

    #[test]
    fn test_cent_precision() {
        // 0.1 + 0.2 style drift must not leak into the total
        let r = record(0.1, 0.2, 0.0, 0.0);
        assert_eq!(total_due(&r, 0.0), 0.3);
    }
}
