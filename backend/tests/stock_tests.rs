//! Stock movement tests
//!
//! Tests for stock level arithmetic including:
//! - Receiving and issuing against current stock
//! - Outward quantity splits and their totals
//! - Rejection rates and low-stock flags

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    is_low_stock, issue, line_amount, receive, rejection_rate, OutwardQuantities, StockError,
};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_receive_increments_stock() {
        assert_eq!(receive(dec("10"), dec("2.5")).unwrap(), dec("12.5"));
    }

    #[test]
    fn test_receive_rejects_zero() {
        let err = receive(dec("10"), Decimal::ZERO).unwrap_err();
        assert_eq!(err.field(), Some("quantity_received"));
    }

    #[test]
    fn test_issue_decrements_stock() {
        assert_eq!(issue(dec("10"), dec("4"), false).unwrap(), dec("6"));
    }

    #[test]
    fn test_issue_down_to_zero_is_allowed() {
        assert_eq!(issue(dec("10"), dec("10"), false).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_issue_beyond_stock_is_refused() {
        let err = issue(dec("3"), dec("5"), false).unwrap_err();
        assert_eq!(
            err,
            StockError::InsufficientStock {
                available: dec("3"),
                requested: dec("5"),
            }
        );
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_issue_beyond_stock_when_negative_allowed() {
        assert_eq!(issue(dec("3"), dec("5"), true).unwrap(), dec("-2"));
    }

    #[test]
    fn test_outward_split_total() {
        let q = OutwardQuantities::new(dec("90"), dec("5"), dec("3"), dec("2"));
        assert_eq!(q.total().unwrap(), dec("100"));
        assert_eq!(q.validate().unwrap(), dec("100"));
    }

    #[test]
    fn test_outward_split_all_zero_is_invalid() {
        let q = OutwardQuantities::default();
        assert_eq!(
            q.validate().unwrap_err(),
            StockError::NonPositiveQuantity { field: "total_qty" }
        );
    }

    #[test]
    fn test_outward_split_negative_part_is_invalid() {
        let q = OutwardQuantities::new(dec("10"), Decimal::ZERO, dec("-1"), Decimal::ZERO);
        assert_eq!(q.validate().unwrap_err().field(), Some("mr_qty"));
    }

    #[test]
    fn test_rejection_rate() {
        assert_eq!(rejection_rate(dec("100"), dec("5"), dec("3")), dec("8"));
        assert_eq!(rejection_rate(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_low_stock_threshold_is_inclusive() {
        assert!(is_low_stock(dec("5"), dec("5")));
        assert!(is_low_stock(dec("4"), dec("5")));
        assert!(!is_low_stock(dec("6"), dec("5")));
    }

    #[test]
    fn test_line_amount() {
        assert_eq!(line_amount(dec("4"), Some(dec("12.50"))), Ok(Some(dec("50.00"))));
        assert_eq!(line_amount(dec("4"), None), Ok(None));
    }

    #[test]
    fn test_line_amount_rounds_like_the_amount_column() {
        assert_eq!(line_amount(dec("0.333"), Some(dec("10.15"))), Ok(Some(dec("3.38"))));
    }

    #[test]
    fn test_huge_quantity_and_rate_do_not_panic() {
        let err = line_amount(dec("79228162514264337593543950"), Some(dec("100000"))).unwrap_err();
        assert_eq!(err.field(), Some("total_amount"));
        let err = receive(Decimal::MAX, Decimal::MAX).unwrap_err();
        assert_eq!(err.field(), Some("current_stock"));
    }

    #[test]
    fn test_fractional_parts_beyond_three_places_rejected() {
        let part = dec("0.0004");
        let q = OutwardQuantities::new(part, part, part, part);
        assert_eq!(q.validate().unwrap_err().field(), Some("ok_qty"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating valid quantities (positive decimals)
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100000i64).prop_map(|n| Decimal::new(n, 2)) // 0.01 to 1000.00
    }

    /// Strategy for generating split parts (zero allowed)
    fn part_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Receiving then issuing the same quantity restores the level
        #[test]
        fn prop_receive_then_issue_restores(
            start in part_strategy(),
            qty in quantity_strategy()
        ) {
            let after = receive(start, qty).unwrap();
            prop_assert_eq!(issue(after, qty, false).unwrap(), start);
        }

        /// Without negative stock, an issue never leaves the level below zero
        #[test]
        fn prop_issue_never_negative(
            start in part_strategy(),
            qty in quantity_strategy()
        ) {
            match issue(start, qty, false) {
                Ok(remaining) => prop_assert!(remaining >= Decimal::ZERO),
                Err(StockError::InsufficientStock { available, requested }) => {
                    prop_assert_eq!(available, start);
                    prop_assert!(requested > start);
                }
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }

        /// Stock equals received minus issued over any accepted sequence
        #[test]
        fn prop_balance_accuracy(
            inward in prop::collection::vec(quantity_strategy(), 1..10),
            outward in prop::collection::vec(quantity_strategy(), 0..10)
        ) {
            let mut stock = Decimal::ZERO;
            let mut received = Decimal::ZERO;
            let mut issued = Decimal::ZERO;
            for qty in &inward {
                stock = receive(stock, *qty).unwrap();
                received += *qty;
            }
            for qty in &outward {
                if let Ok(next) = issue(stock, *qty, false) {
                    stock = next;
                    issued += *qty;
                }
            }
            prop_assert_eq!(stock, received - issued);
            prop_assert!(stock >= Decimal::ZERO);
        }

        /// The validated total is always the sum of the four parts
        #[test]
        fn prop_split_total_is_sum(
            ok in part_strategy(),
            cr in part_strategy(),
            mr in part_strategy(),
            as_cast in part_strategy()
        ) {
            let q = OutwardQuantities::new(ok, cr, mr, as_cast);
            let sum = ok + cr + mr + as_cast;
            match q.validate() {
                Ok(total) => {
                    prop_assert_eq!(total, sum);
                    prop_assert!(total > Decimal::ZERO);
                }
                Err(_) => prop_assert_eq!(sum, Decimal::ZERO),
            }
        }

        /// Any quantity times any two-place rate yields an amount or a
        /// field error, never a panic
        #[test]
        fn prop_line_amount_total(
            mantissa in any::<i64>(),
            scale in 0u32..10,
            rate in 0i64..i64::MAX
        ) {
            let quantity = Decimal::new(mantissa, scale);
            match line_amount(quantity, Some(Decimal::new(rate, 2))) {
                Ok(Some(amount)) => prop_assert!(amount.scale() <= 2),
                Ok(None) => prop_assert!(false, "rate was given"),
                Err(err) => prop_assert_eq!(err.field(), Some("total_amount")),
            }
        }

        /// Rejection rate stays within 0..=100
        #[test]
        fn prop_rejection_rate_bounded(
            ok in part_strategy(),
            cr in part_strategy(),
            mr in part_strategy()
        ) {
            let total = ok + cr + mr;
            let rate = rejection_rate(total, cr, mr);
            prop_assert!(rate >= Decimal::ZERO);
            prop_assert!(rate <= Decimal::ONE_HUNDRED);
        }
    }
}
