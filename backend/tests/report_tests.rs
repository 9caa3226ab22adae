//! Report tests
//!
//! Tests for report reductions including:
//! - Stock statement column totals
//! - Monthly periods
//! - Merged item history ordering and limits
//! - Per-party performance rounding

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    merge_history, CustomerPerformanceRow, HistoryEntry, InwardEntry, Item, ItemHistory,
    MonthPeriod, OutwardEntry, StockStatement, StockStatementRow, SupplierPerformanceRow,
};
use std::str::FromStr;
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

fn item() -> Item {
    Item {
        id: Uuid::new_v4(),
        name: "Flange 4in".into(),
        description: None,
        category: "Castings".into(),
        unit: "pcs".into(),
        current_stock: dec("40"),
        minimum_stock: dec("10"),
        is_active: true,
        created_by: None,
        created_at: at(0),
        updated_at: at(0),
    }
}

fn inward(on: NaiveDate, created: i64, qty: &str, amount: Option<&str>) -> InwardEntry {
    InwardEntry {
        id: Uuid::new_v4(),
        date: on,
        challan_no: format!("IN-{}", created),
        supplier_id: Uuid::new_v4(),
        supplier_name: "Acme Foundry".into(),
        supplier_contact: None,
        item_id: Uuid::new_v4(),
        item_name: "Flange 4in".into(),
        item_category: "Castings".into(),
        quantity_received: dec(qty),
        unit: "pcs".into(),
        rate: None,
        total_amount: amount.map(dec),
        remarks: None,
        created_by: None,
        created_by_name: None,
        created_at: at(created),
    }
}

fn outward(on: NaiveDate, created: i64, ok: &str, cr: &str, mr: &str) -> OutwardEntry {
    let (ok, cr, mr) = (dec(ok), dec(cr), dec(mr));
    OutwardEntry {
        id: Uuid::new_v4(),
        date: on,
        challan_no: format!("OUT-{}", created),
        customer_id: Uuid::new_v4(),
        customer_name: "Beta Motors".into(),
        customer_contact: None,
        item_id: Uuid::new_v4(),
        item_name: "Flange 4in".into(),
        item_category: "Castings".into(),
        ok_qty: ok,
        cr_qty: cr,
        mr_qty: mr,
        as_cast_qty: Decimal::ZERO,
        total_qty: ok + cr + mr,
        unit: "pcs".into(),
        rate: None,
        total_amount: None,
        cr_reason: None,
        mr_reason: None,
        remarks: None,
        created_by: None,
        created_by_name: None,
        created_at: at(created),
    }
}

fn statement_row(current: &str, minimum: &str, inward: &str, outward: &str) -> StockStatementRow {
    StockStatementRow {
        item_id: Uuid::new_v4(),
        name: "Hub".into(),
        description: None,
        category: "Castings".into(),
        unit: "pcs".into(),
        current_stock: dec(current),
        minimum_stock: dec(minimum),
        is_active: true,
        total_inward: dec(inward),
        total_outward: dec(outward),
        total_ok_qty: dec(outward),
        total_cr_qty: Decimal::ZERO,
        total_mr_qty: Decimal::ZERO,
        total_as_cast_qty: Decimal::ZERO,
        inward_amount: Decimal::ZERO,
        outward_amount: Decimal::ZERO,
        is_low_stock: dec(current) <= dec(minimum),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_stock_statement_summary() {
        let statement = StockStatement::new(vec![
            statement_row("40", "10", "50", "10"),
            statement_row("3", "5", "8", "5"),
        ]);
        let summary = &statement.summary;
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.total_current_stock, dec("43"));
        assert_eq!(summary.total_inward, dec("58"));
        assert_eq!(summary.total_outward, dec("15"));
        assert_eq!(summary.low_stock_items, 1);
    }

    #[test]
    fn test_empty_stock_statement_is_zeroed() {
        let statement = StockStatement::new(vec![]);
        assert_eq!(statement.summary.total_items, 0);
        assert_eq!(statement.summary.total_current_stock, Decimal::ZERO);
    }

    #[test]
    fn test_month_period_leap_february() {
        let period = MonthPeriod::new(2, 2024).unwrap();
        assert_eq!(period.start_date, date(2024, 2, 1));
        assert_eq!(period.end_date, date(2024, 2, 29));
        assert_eq!(MonthPeriod::containing(date(2024, 2, 29)), period);
        assert_ne!(MonthPeriod::containing(date(2024, 3, 1)), period);
    }

    #[test]
    fn test_merge_history_orders_by_date_then_creation() {
        let ins = vec![
            inward(date(2024, 11, 1), 10, "5", None),
            inward(date(2024, 11, 3), 20, "5", None),
        ];
        let outs = vec![
            outward(date(2024, 11, 3), 30, "2", "0", "0"),
            outward(date(2024, 11, 2), 40, "1", "0", "0"),
        ];
        let merged = merge_history(&ins, &outs, 10);

        let challans: Vec<&str> = merged
            .iter()
            .map(|e| match e {
                HistoryEntry::Inward(i) => i.challan_no.as_str(),
                HistoryEntry::Outward(o) => o.challan_no.as_str(),
            })
            .collect();
        assert_eq!(challans, vec!["OUT-30", "IN-20", "OUT-40", "IN-10"]);
    }

    #[test]
    fn test_merge_history_truncates() {
        let ins = vec![
            inward(date(2024, 11, 1), 1, "5", None),
            inward(date(2024, 11, 2), 2, "5", None),
        ];
        let outs = vec![outward(date(2024, 11, 3), 3, "2", "0", "0")];
        assert_eq!(merge_history(&ins, &outs, 2).len(), 2);
    }

    #[test]
    fn test_history_entry_serializes_with_type_tag() {
        let entry = HistoryEntry::Inward(inward(date(2024, 11, 1), 1, "5", None));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "inward");
        assert_eq!(json["challan_no"], "IN-1");
    }

    #[test]
    fn test_item_history_summaries() {
        let history = ItemHistory::build(
            item(),
            vec![
                inward(date(2024, 11, 1), 1, "10", Some("100")),
                inward(date(2024, 11, 2), 2, "5", None),
            ],
            vec![outward(date(2024, 11, 3), 3, "7", "2", "1")],
            100,
        );
        assert_eq!(history.inward_summary.total_quantity, dec("15"));
        assert_eq!(history.inward_summary.total_amount, dec("100"));
        assert_eq!(history.inward_summary.transaction_count, 2);
        assert_eq!(history.outward_summary.total_quantity, dec("10"));
        assert_eq!(history.outward_summary.total_cr_qty, dec("2"));
        assert_eq!(history.all_transactions.len(), 3);
    }

    #[test]
    fn test_ledger_row_for_outward_carries_split() {
        let row = HistoryEntry::Outward(outward(date(2024, 11, 3), 3, "7", "2", "1")).to_ledger_row();
        assert_eq!(row.kind, "outward");
        assert_eq!(row.quantity, dec("10"));
        assert_eq!(row.cr_qty, Some(dec("2")));
        assert_eq!(row.party, "Beta Motors");
    }

    #[test]
    fn test_supplier_performance_rounds_averages() {
        let row = SupplierPerformanceRow {
            supplier_id: Uuid::new_v4(),
            supplier_name: "Acme Foundry".into(),
            supplier_contact: None,
            supplier_email: None,
            supplier_phone: None,
            total_transactions: 3,
            total_quantity: dec("10"),
            total_amount: dec("100"),
            average_quantity: dec("3.333333"),
            average_amount: dec("33.335"),
            first_transaction: date(2024, 1, 1),
            last_transaction: date(2024, 3, 1),
        }
        .finalize();
        assert_eq!(row.average_quantity, dec("3.33"));
        assert_eq!(row.average_amount, dec("33.34"));
    }

    #[test]
    fn test_customer_performance_rejection_rate() {
        let row = CustomerPerformanceRow {
            customer_id: Uuid::new_v4(),
            customer_name: "Beta Motors".into(),
            customer_contact: None,
            customer_email: None,
            customer_phone: None,
            total_transactions: 2,
            total_quantity: dec("300"),
            total_ok_qty: dec("290"),
            total_cr_qty: dec("6"),
            total_mr_qty: dec("4"),
            total_as_cast_qty: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            average_quantity: dec("150"),
            average_amount: Decimal::ZERO,
            rejection_rate: Decimal::ZERO,
            first_transaction: date(2024, 1, 1),
            last_transaction: date(2024, 1, 9),
        }
        .finalize();
        assert_eq!(row.rejection_rate, dec("3.33"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating report months
    fn month_strategy() -> impl Strategy<Value = (u32, i32)> {
        (1u32..=12u32, 2020i32..=2030i32)
    }

    /// Strategy for generating dates within 2024
    fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (0i64..366i64).prop_map(|d| date(2024, 1, 1) + Duration::days(d))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// A period starts on the 1st, ends on its last day, and the next day
        /// belongs to the following month
        #[test]
        fn prop_month_period_covers_whole_month((month, year) in month_strategy()) {
            let period = MonthPeriod::new(month, year).unwrap();
            prop_assert_eq!(period.start_date, date(year, month, 1));
            prop_assert!(period.start_date <= period.end_date);
            let next = period.end_date + Duration::days(1);
            prop_assert_eq!(next.day(), 1);
            prop_assert_ne!(MonthPeriod::containing(next), period.clone());
            prop_assert_eq!(MonthPeriod::containing(period.end_date), period);
        }

        /// Merged history is sorted most recent first and never exceeds the limit
        #[test]
        fn prop_merge_history_sorted_and_limited(
            in_dates in prop::collection::vec(date_strategy(), 0..15),
            out_dates in prop::collection::vec(date_strategy(), 0..15),
            limit in 1usize..20usize
        ) {
            let ins: Vec<InwardEntry> = in_dates
                .iter()
                .enumerate()
                .map(|(i, d)| inward(*d, i as i64, "1", None))
                .collect();
            let outs: Vec<OutwardEntry> = out_dates
                .iter()
                .enumerate()
                .map(|(i, d)| outward(*d, 100 + i as i64, "1", "0", "0"))
                .collect();

            let merged = merge_history(&ins, &outs, limit);
            prop_assert_eq!(merged.len(), (ins.len() + outs.len()).min(limit));
            for pair in merged.windows(2) {
                prop_assert!(pair[0].date() >= pair[1].date());
            }
        }

        /// Statement totals equal the column sums
        #[test]
        fn prop_stock_summary_matches_columns(
            stocks in prop::collection::vec((0i64..1000, 0i64..100), 0..20)
        ) {
            let rows: Vec<StockStatementRow> = stocks
                .iter()
                .map(|(cur, min)| statement_row(&cur.to_string(), &min.to_string(), "0", "0"))
                .collect();
            let statement = StockStatement::new(rows);

            let expected: i64 = stocks.iter().map(|(c, _)| c).sum();
            let low = stocks.iter().filter(|(c, m)| c <= m).count() as u64;
            prop_assert_eq!(statement.summary.total_current_stock, Decimal::from(expected));
            prop_assert_eq!(statement.summary.low_stock_items, low);
            prop_assert_eq!(statement.summary.total_items, stocks.len() as u64);
        }
    }
}
