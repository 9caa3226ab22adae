//! Report models and the reductions that summarize them
//!
//! Grouped sums come out of the database; anything computed over the
//! fetched rows (summaries, rejection rates, rounding, merged histories)
//! lives here so it can be exercised without a database.

use chrono::{Datelike, DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{rejection_rate, InwardEntry, Item, OutwardEntry};

/// Output format requested for a report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
    Xlsx,
    Pdf,
}

impl ReportFormat {
    pub fn parse(value: Option<&str>) -> Result<Self, &'static str> {
        match value.map(str::to_ascii_lowercase).as_deref() {
            None | Some("") | Some("json") => Ok(ReportFormat::Json),
            Some("csv") => Ok(ReportFormat::Csv),
            Some("xlsx") | Some("excel") => Ok(ReportFormat::Xlsx),
            Some("pdf") => Ok(ReportFormat::Pdf),
            Some(_) => Err("Format must be one of json, csv, xlsx, pdf"),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Json => "application/json",
            ReportFormat::Csv => "text/csv",
            ReportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ReportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Pdf => "pdf",
        }
    }
}

/// Round to two decimal places, ties to even
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English month name for 1..=12
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
}

// ============================================================================
// Stock statement
// ============================================================================

/// One item line of the stock statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockStatementRow {
    pub item_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub unit: String,
    pub current_stock: Decimal,
    pub minimum_stock: Decimal,
    pub is_active: bool,
    pub total_inward: Decimal,
    pub total_outward: Decimal,
    pub total_ok_qty: Decimal,
    pub total_cr_qty: Decimal,
    pub total_mr_qty: Decimal,
    pub total_as_cast_qty: Decimal,
    pub inward_amount: Decimal,
    pub outward_amount: Decimal,
    pub is_low_stock: bool,
}

/// Column totals of the stock statement
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StockSummary {
    pub total_items: u64,
    pub total_current_stock: Decimal,
    pub total_inward: Decimal,
    pub total_outward: Decimal,
    pub total_ok_qty: Decimal,
    pub total_cr_qty: Decimal,
    pub total_mr_qty: Decimal,
    pub total_as_cast_qty: Decimal,
    pub total_inward_amount: Decimal,
    pub total_outward_amount: Decimal,
    pub low_stock_items: u64,
}

impl StockSummary {
    pub fn from_rows(rows: &[StockStatementRow]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            acc.total_items += 1;
            acc.total_current_stock += row.current_stock;
            acc.total_inward += row.total_inward;
            acc.total_outward += row.total_outward;
            acc.total_ok_qty += row.total_ok_qty;
            acc.total_cr_qty += row.total_cr_qty;
            acc.total_mr_qty += row.total_mr_qty;
            acc.total_as_cast_qty += row.total_as_cast_qty;
            acc.total_inward_amount += row.inward_amount;
            acc.total_outward_amount += row.outward_amount;
            if row.is_low_stock {
                acc.low_stock_items += 1;
            }
            acc
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockStatement {
    pub summary: StockSummary,
    pub items: Vec<StockStatementRow>,
}

impl StockStatement {
    pub fn new(items: Vec<StockStatementRow>) -> Self {
        Self {
            summary: StockSummary::from_rows(&items),
            items,
        }
    }
}

// ============================================================================
// Monthly report
// ============================================================================

/// Calendar month a monthly report covers; both ends inclusive
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthPeriod {
    pub month: u32,
    pub year: i32,
    pub month_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl MonthPeriod {
    pub fn new(month: u32, year: i32) -> Result<Self, &'static str> {
        let name = month_name(month).ok_or("Month must be between 1 and 12")?;
        let start_date = NaiveDate::from_ymd_opt(year, month, 1).ok_or("Invalid year")?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end_date = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or("Invalid year")?;

        Ok(Self {
            month,
            year,
            month_name: name.to_string(),
            start_date,
            end_date,
        })
    }

    /// Period containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        let start_date = date.with_day(1).unwrap_or(date);
        let end_date = Self::new(date.month(), date.year())
            .map(|p| p.end_date)
            .unwrap_or(date);
        Self {
            month: date.month(),
            year: date.year(),
            month_name: month_name(date.month()).unwrap_or_default().to_string(),
            start_date,
            end_date,
        }
    }

    pub fn title(&self) -> String {
        format!("{} {}", self.month_name, self.year)
    }
}

/// Inward totals for a period
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InwardMonthSummary {
    pub total_entries: i64,
    pub total_quantity: Decimal,
    pub total_amount: Decimal,
    pub supplier_count: i64,
    pub item_count: i64,
}

/// Outward totals for a period
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OutwardMonthSummary {
    pub total_entries: i64,
    pub total_quantity: Decimal,
    pub total_ok_qty: Decimal,
    pub total_cr_qty: Decimal,
    pub total_mr_qty: Decimal,
    pub total_as_cast_qty: Decimal,
    pub total_amount: Decimal,
    pub customer_count: i64,
    pub item_count: i64,
}

impl OutwardMonthSummary {
    pub fn rejection_rate(&self) -> Decimal {
        round2(rejection_rate(
            self.total_quantity,
            self.total_cr_qty,
            self.total_mr_qty,
        ))
    }
}

/// Per-item outward totals for a period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ItemBreakdownRow {
    pub item_id: Uuid,
    pub item_name: String,
    pub item_category: String,
    pub item_unit: String,
    pub total_quantity: Decimal,
    pub total_ok_qty: Decimal,
    pub total_cr_qty: Decimal,
    pub total_mr_qty: Decimal,
    pub total_as_cast_qty: Decimal,
    pub total_amount: Decimal,
    pub entry_count: i64,
    #[cfg_attr(feature = "sqlx", sqlx(default))]
    pub rejection_rate: Decimal,
}

/// Fill in rejection rates and order by issued quantity, largest first
pub fn finalize_breakdown(mut rows: Vec<ItemBreakdownRow>) -> Vec<ItemBreakdownRow> {
    for row in &mut rows {
        row.rejection_rate = rejection_rate(row.total_quantity, row.total_cr_qty, row.total_mr_qty);
    }
    rows.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
    rows
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub period: MonthPeriod,
    pub inward: InwardMonthSummary,
    pub outward: OutwardMonthSummary,
    pub item_breakdown: Vec<ItemBreakdownRow>,
    pub detailed_inward: Option<Vec<InwardEntry>>,
    pub detailed_outward: Option<Vec<OutwardEntry>>,
}

// ============================================================================
// Item history
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InwardHistorySummary {
    pub total_quantity: Decimal,
    pub total_amount: Decimal,
    pub transaction_count: u64,
}

impl InwardHistorySummary {
    pub fn from_entries(entries: &[InwardEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, e| {
            acc.total_quantity += e.quantity_received;
            acc.total_amount += e.total_amount.unwrap_or_default();
            acc.transaction_count += 1;
            acc
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OutwardHistorySummary {
    pub total_quantity: Decimal,
    pub total_ok_qty: Decimal,
    pub total_cr_qty: Decimal,
    pub total_mr_qty: Decimal,
    pub total_as_cast_qty: Decimal,
    pub total_amount: Decimal,
    pub transaction_count: u64,
}

impl OutwardHistorySummary {
    pub fn from_entries(entries: &[OutwardEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, e| {
            acc.total_quantity += e.total_qty;
            acc.total_ok_qty += e.ok_qty;
            acc.total_cr_qty += e.cr_qty;
            acc.total_mr_qty += e.mr_qty;
            acc.total_as_cast_qty += e.as_cast_qty;
            acc.total_amount += e.total_amount.unwrap_or_default();
            acc.transaction_count += 1;
            acc
        })
    }
}

/// A stock movement of either direction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HistoryEntry {
    Inward(InwardEntry),
    Outward(OutwardEntry),
}

impl HistoryEntry {
    pub fn date(&self) -> NaiveDate {
        match self {
            HistoryEntry::Inward(e) => e.date,
            HistoryEntry::Outward(e) => e.date,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            HistoryEntry::Inward(e) => e.created_at,
            HistoryEntry::Outward(e) => e.created_at,
        }
    }

    /// Flat row for tabular exports
    pub fn to_ledger_row(&self) -> LedgerRow {
        match self {
            HistoryEntry::Inward(e) => LedgerRow {
                kind: "inward",
                date: e.date,
                challan_no: e.challan_no.clone(),
                party: e.supplier_name.clone(),
                quantity: e.quantity_received,
                ok_qty: None,
                cr_qty: None,
                mr_qty: None,
                as_cast_qty: None,
                rate: e.rate,
                amount: e.total_amount,
                remarks: e.remarks.clone(),
            },
            HistoryEntry::Outward(e) => LedgerRow {
                kind: "outward",
                date: e.date,
                challan_no: e.challan_no.clone(),
                party: e.customer_name.clone(),
                quantity: e.total_qty,
                ok_qty: Some(e.ok_qty),
                cr_qty: Some(e.cr_qty),
                mr_qty: Some(e.mr_qty),
                as_cast_qty: Some(e.as_cast_qty),
                rate: e.rate,
                amount: e.total_amount,
                remarks: e.remarks.clone(),
            },
        }
    }
}

/// Flattened history line
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LedgerRow {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub date: NaiveDate,
    pub challan_no: String,
    pub party: String,
    pub quantity: Decimal,
    pub ok_qty: Option<Decimal>,
    pub cr_qty: Option<Decimal>,
    pub mr_qty: Option<Decimal>,
    pub as_cast_qty: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub remarks: Option<String>,
}

/// Interleave both directions, most recent first, keeping at most `limit`
pub fn merge_history(
    inward: &[InwardEntry],
    outward: &[OutwardEntry],
    limit: usize,
) -> Vec<HistoryEntry> {
    let mut all: Vec<HistoryEntry> = inward
        .iter()
        .cloned()
        .map(HistoryEntry::Inward)
        .chain(outward.iter().cloned().map(HistoryEntry::Outward))
        .collect();
    all.sort_by(|a, b| {
        b.date()
            .cmp(&a.date())
            .then_with(|| b.created_at().cmp(&a.created_at()))
    });
    all.truncate(limit);
    all
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemHistory {
    pub item: Item,
    pub inward_summary: InwardHistorySummary,
    pub outward_summary: OutwardHistorySummary,
    pub inward_transactions: Vec<InwardEntry>,
    pub outward_transactions: Vec<OutwardEntry>,
    pub all_transactions: Vec<HistoryEntry>,
}

impl ItemHistory {
    pub fn build(
        item: Item,
        inward_transactions: Vec<InwardEntry>,
        outward_transactions: Vec<OutwardEntry>,
        limit: usize,
    ) -> Self {
        let all_transactions = merge_history(&inward_transactions, &outward_transactions, limit);
        Self {
            item,
            inward_summary: InwardHistorySummary::from_entries(&inward_transactions),
            outward_summary: OutwardHistorySummary::from_entries(&outward_transactions),
            inward_transactions,
            outward_transactions,
            all_transactions,
        }
    }
}

// ============================================================================
// Supplier / customer performance
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SupplierPerformanceRow {
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub supplier_contact: Option<String>,
    pub supplier_email: Option<String>,
    pub supplier_phone: Option<String>,
    pub total_transactions: i64,
    pub total_quantity: Decimal,
    pub total_amount: Decimal,
    pub average_quantity: Decimal,
    pub average_amount: Decimal,
    pub first_transaction: NaiveDate,
    pub last_transaction: NaiveDate,
}

impl SupplierPerformanceRow {
    pub fn finalize(mut self) -> Self {
        self.average_quantity = round2(self.average_quantity);
        self.average_amount = round2(self.average_amount);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CustomerPerformanceRow {
    pub customer_id: Uuid,
    pub customer_name: String,
    pub customer_contact: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub total_transactions: i64,
    pub total_quantity: Decimal,
    pub total_ok_qty: Decimal,
    pub total_cr_qty: Decimal,
    pub total_mr_qty: Decimal,
    pub total_as_cast_qty: Decimal,
    pub total_amount: Decimal,
    pub average_quantity: Decimal,
    pub average_amount: Decimal,
    #[cfg_attr(feature = "sqlx", sqlx(default))]
    pub rejection_rate: Decimal,
    pub first_transaction: NaiveDate,
    pub last_transaction: NaiveDate,
}

impl CustomerPerformanceRow {
    pub fn finalize(mut self) -> Self {
        self.average_quantity = round2(self.average_quantity);
        self.average_amount = round2(self.average_amount);
        self.rejection_rate = round2(rejection_rate(
            self.total_quantity,
            self.total_cr_qty,
            self.total_mr_qty,
        ));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_month_period_bounds() {
        let feb = MonthPeriod::new(2, 2024).unwrap();
        assert_eq!(feb.month_name, "February");
        assert_eq!(feb.start_date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(feb.end_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let dec_period = MonthPeriod::new(12, 2025).unwrap();
        assert_eq!(dec_period.end_date, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());

        assert!(MonthPeriod::new(0, 2024).is_err());
        assert!(MonthPeriod::new(13, 2024).is_err());
    }

    #[test]
    fn test_month_period_containing() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 17).unwrap();
        let period = MonthPeriod::containing(date);
        assert_eq!(period, MonthPeriod::new(11, 2024).unwrap());
        assert!(period.start_date <= date && date <= period.end_date);
        assert_eq!(period.title(), "November 2024");
    }

    #[test]
    fn test_round2_ties_to_even() {
        assert_eq!(round2(dec("2.345")), dec("2.34"));
        assert_eq!(round2(dec("2.355")), dec("2.36"));
        assert_eq!(round2(dec("33.3333")), dec("33.33"));
    }

    #[test]
    fn test_report_format_parse() {
        assert_eq!(ReportFormat::parse(None), Ok(ReportFormat::Json));
        assert_eq!(ReportFormat::parse(Some("XLSX")), Ok(ReportFormat::Xlsx));
        assert_eq!(ReportFormat::parse(Some("excel")), Ok(ReportFormat::Xlsx));
        assert!(ReportFormat::parse(Some("docx")).is_err());
    }

    #[test]
    fn test_finalize_breakdown_sorts_and_rates() {
        let row = |name: &str, total: &str, cr: &str, mr: &str| ItemBreakdownRow {
            item_id: Uuid::new_v4(),
            item_name: name.into(),
            item_category: "Castings".into(),
            item_unit: "pcs".into(),
            total_quantity: dec(total),
            total_ok_qty: dec(total) - dec(cr) - dec(mr),
            total_cr_qty: dec(cr),
            total_mr_qty: dec(mr),
            total_as_cast_qty: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            entry_count: 1,
            rejection_rate: Decimal::ZERO,
        };
        let rows = finalize_breakdown(vec![row("small", "50", "5", "0"), row("big", "400", "10", "10")]);
        assert_eq!(rows[0].item_name, "big");
        assert_eq!(rows[0].rejection_rate, dec("5"));
        assert_eq!(rows[1].rejection_rate, dec("10"));
    }
}
