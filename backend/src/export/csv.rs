//! CSV rendering of report tables

use serde::Serialize;
use shared::{
    CustomerPerformanceRow, ItemBreakdownRow, LedgerRow, StockStatementRow,
    SupplierPerformanceRow,
};

use crate::error::{AppError, AppResult};

/// A report row with a fixed column header, in serialization order
pub trait CsvRecord: Serialize {
    const HEADERS: &'static [&'static str];
}

impl CsvRecord for StockStatementRow {
    const HEADERS: &'static [&'static str] = &[
        "item_id",
        "name",
        "description",
        "category",
        "unit",
        "current_stock",
        "minimum_stock",
        "is_active",
        "total_inward",
        "total_outward",
        "total_ok_qty",
        "total_cr_qty",
        "total_mr_qty",
        "total_as_cast_qty",
        "inward_amount",
        "outward_amount",
        "is_low_stock",
    ];
}

impl CsvRecord for ItemBreakdownRow {
    const HEADERS: &'static [&'static str] = &[
        "item_id",
        "item_name",
        "item_category",
        "item_unit",
        "total_quantity",
        "total_ok_qty",
        "total_cr_qty",
        "total_mr_qty",
        "total_as_cast_qty",
        "total_amount",
        "entry_count",
        "rejection_rate",
    ];
}

impl CsvRecord for LedgerRow {
    const HEADERS: &'static [&'static str] = &[
        "type",
        "date",
        "challan_no",
        "party",
        "quantity",
        "ok_qty",
        "cr_qty",
        "mr_qty",
        "as_cast_qty",
        "rate",
        "amount",
        "remarks",
    ];
}

impl CsvRecord for SupplierPerformanceRow {
    const HEADERS: &'static [&'static str] = &[
        "supplier_id",
        "supplier_name",
        "supplier_contact",
        "supplier_email",
        "supplier_phone",
        "total_transactions",
        "total_quantity",
        "total_amount",
        "average_quantity",
        "average_amount",
        "first_transaction",
        "last_transaction",
    ];
}

impl CsvRecord for CustomerPerformanceRow {
    const HEADERS: &'static [&'static str] = &[
        "customer_id",
        "customer_name",
        "customer_contact",
        "customer_email",
        "customer_phone",
        "total_transactions",
        "total_quantity",
        "total_ok_qty",
        "total_cr_qty",
        "total_mr_qty",
        "total_as_cast_qty",
        "total_amount",
        "average_quantity",
        "average_amount",
        "rejection_rate",
        "first_transaction",
        "last_transaction",
    ];
}

/// Serialize rows to CSV; the header row is written even when there are no rows
pub fn to_csv<T: CsvRecord>(rows: &[T]) -> AppResult<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);

    wtr.write_record(T::HEADERS)
        .map_err(|e| AppError::Export(format!("CSV header error: {}", e)))?;

    for row in rows {
        wtr.serialize(row)
            .map_err(|e| AppError::Export(format!("CSV serialization error: {}", e)))?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::Export(format!("CSV writer error: {}", e)))
}
