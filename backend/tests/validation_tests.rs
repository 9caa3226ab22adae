//! Input validation tests
//!
//! Tests for request validation including:
//! - Report query parameters (month, year, history limit, date ranges)
//! - Pagination bounds
//! - Entry input rules enforced through `validator`

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    validate_date_range, validate_history_limit, validate_month, validate_year,
    CreateInwardInput, CreateItemInput, CreateOutwardInput, Pagination, RegisterInput,
    ReportFormat, DEFAULT_HISTORY_LIMIT, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn outward_input(ok: &str, cr: &str, mr: &str, as_cast: &str) -> CreateOutwardInput {
    serde_json::from_value(serde_json::json!({
        "challan_no": "OUT-1",
        "customer_id": Uuid::new_v4(),
        "item_id": Uuid::new_v4(),
        "ok_qty": ok,
        "cr_qty": cr,
        "mr_qty": mr,
        "as_cast_qty": as_cast,
    }))
    .unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn test_year_bounds() {
        assert!(validate_year(2020).is_ok());
        assert!(validate_year(2030).is_ok());
        assert!(validate_year(2019).is_err());
        assert!(validate_year(2031).is_err());
    }

    #[test]
    fn test_history_limit() {
        assert_eq!(validate_history_limit(None), Ok(DEFAULT_HISTORY_LIMIT));
        assert_eq!(validate_history_limit(Some(1000)), Ok(1000));
        assert!(validate_history_limit(Some(0)).is_err());
        assert!(validate_history_limit(Some(1001)).is_err());
    }

    #[test]
    fn test_date_range() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 1);
        let b = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert!(validate_date_range(a, b).is_ok());
        assert!(validate_date_range(a, a).is_ok());
        assert!(validate_date_range(None, b).is_ok());
        assert!(validate_date_range(b, a).is_err());
    }

    #[test]
    fn test_register_email_and_password() {
        let register = |email: &str, password: &str| RegisterInput {
            name: "Store Keeper".into(),
            email: email.into(),
            password: password.into(),
        };
        assert!(register("store@example.com", "longenough").validate().is_ok());

        let errors = register("store.example.com", "longenough").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));

        let errors = register("store@example.com", "short").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_pagination_defaults_and_clamp() {
        let p = Pagination::from_query(None, None);
        assert_eq!((p.page, p.limit), (1, DEFAULT_PAGE_LIMIT));
        let p = Pagination::from_query(Some(0), Some(500));
        assert_eq!((p.page, p.limit), (1, MAX_PAGE_LIMIT));
        assert_eq!(Pagination::from_query(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn test_report_format_content_types() {
        assert_eq!(ReportFormat::Csv.content_type(), "text/csv");
        assert_eq!(ReportFormat::Pdf.extension(), "pdf");
        assert_eq!(ReportFormat::parse(Some("excel")), Ok(ReportFormat::Xlsx));
    }

    #[test]
    fn test_item_input_requires_name() {
        let input: CreateItemInput = serde_json::from_value(serde_json::json!({
            "name": "",
            "category": "Castings",
        }))
        .unwrap();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_inward_quantity_must_be_positive() {
        let input: CreateInwardInput = serde_json::from_value(serde_json::json!({
            "challan_no": "IN-1",
            "supplier_id": Uuid::new_v4(),
            "item_id": Uuid::new_v4(),
            "quantity_received": "0",
        }))
        .unwrap();
        let err = input.check_quantities().unwrap_err();
        assert_eq!(err.field(), Some("quantity_received"));
    }

    #[test]
    fn test_outward_total_computed_from_split() {
        let input = outward_input("10", "1", "0.5", "0");
        assert_eq!(input.check_quantities().unwrap(), dec("11.5"));
    }

    #[test]
    fn test_inward_rate_limited_to_two_places() {
        let input: CreateInwardInput = serde_json::from_value(serde_json::json!({
            "challan_no": "IN-2",
            "supplier_id": Uuid::new_v4(),
            "item_id": Uuid::new_v4(),
            "quantity_received": "3",
            "rate": "2.555",
        }))
        .unwrap();
        assert_eq!(input.check_quantities().unwrap_err().field(), Some("rate"));
    }

    #[test]
    fn test_outward_all_zero_rejected() {
        let input = outward_input("0", "0", "0", "0");
        assert_eq!(input.check_quantities().unwrap_err().field(), Some("total_qty"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Only 1..=12 is a valid month
        #[test]
        fn prop_month_validation(month in 0u32..100u32) {
            prop_assert_eq!(validate_month(month).is_ok(), (1..=12).contains(&month));
        }

        /// Only 2020..=2030 is a valid report year
        #[test]
        fn prop_year_validation(year in 1990i32..2100i32) {
            prop_assert_eq!(validate_year(year).is_ok(), (2020..=2030).contains(&year));
        }

        /// Page size always lands within 1..=MAX_PAGE_LIMIT
        #[test]
        fn prop_pagination_clamped(page in proptest::option::of(0u32..1000), limit in proptest::option::of(0u32..1000)) {
            let p = Pagination::from_query(page, limit);
            prop_assert!(p.page >= 1);
            prop_assert!(p.limit >= 1 && p.limit <= MAX_PAGE_LIMIT);
            prop_assert!(p.offset() >= 0);
        }

        /// Any non-negative split with a positive sum is accepted with that sum
        #[test]
        fn prop_outward_split_accepted(
            ok in 0u32..1000,
            cr in 0u32..100,
            mr in 0u32..100,
            as_cast in 0u32..100
        ) {
            let input = outward_input(&ok.to_string(), &cr.to_string(), &mr.to_string(), &as_cast.to_string());
            let sum = Decimal::from(ok + cr + mr + as_cast);
            match input.check_quantities() {
                Ok(total) => prop_assert_eq!(total, sum),
                Err(_) => prop_assert_eq!(sum, Decimal::ZERO),
            }
        }
    }
}
