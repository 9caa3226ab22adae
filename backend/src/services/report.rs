//! Reporting service
//!
//! Grouped totals are computed in SQL; summaries, rejection rates and the
//! merged item history are finished in `shared::report`.

use chrono::NaiveDate;
use shared::{
    finalize_breakdown, validate_date_range, validate_history_limit, CustomerPerformanceRow,
    InwardEntry, InwardMonthSummary, ItemBreakdownRow, ItemHistory, MonthPeriod, MonthlyReport,
    OutwardEntry, OutwardMonthSummary, StockStatement, StockStatementRow, SupplierPerformanceRow,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::inward::INWARD_SELECT;
use super::item::ItemService;
use super::like_pattern;
use super::outward::OUTWARD_SELECT;
use crate::config::ReportsConfig;
use crate::error::{AppError, AppResult};

/// Reporting service
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
    history_default_limit: u32,
}

impl ReportService {
    /// Create a new ReportService instance
    pub fn new(db: PgPool, reports: &ReportsConfig) -> Self {
        Self {
            db,
            history_default_limit: reports.history_default_limit,
        }
    }

    /// Per-item movement totals against current stock
    pub async fn stock_statement(
        &self,
        category: Option<&str>,
        is_active: Option<bool>,
    ) -> AppResult<StockStatement> {
        let rows = sqlx::query_as::<_, StockStatementRow>(
            r#"
            SELECT it.id AS item_id, it.name, it.description, it.category, it.unit,
                   it.current_stock, it.minimum_stock, it.is_active,
                   COALESCE(inw.total_inward, 0) AS total_inward,
                   COALESCE(outw.total_outward, 0) AS total_outward,
                   COALESCE(outw.total_ok_qty, 0) AS total_ok_qty,
                   COALESCE(outw.total_cr_qty, 0) AS total_cr_qty,
                   COALESCE(outw.total_mr_qty, 0) AS total_mr_qty,
                   COALESCE(outw.total_as_cast_qty, 0) AS total_as_cast_qty,
                   COALESCE(inw.inward_amount, 0) AS inward_amount,
                   COALESCE(outw.outward_amount, 0) AS outward_amount,
                   (it.current_stock <= it.minimum_stock) AS is_low_stock
            FROM items it
            LEFT JOIN (
                SELECT item_id,
                       SUM(quantity_received) AS total_inward,
                       SUM(COALESCE(total_amount, 0)) AS inward_amount
                FROM inward_stock
                GROUP BY item_id
            ) inw ON inw.item_id = it.id
            LEFT JOIN (
                SELECT item_id,
                       SUM(total_qty) AS total_outward,
                       SUM(ok_qty) AS total_ok_qty,
                       SUM(cr_qty) AS total_cr_qty,
                       SUM(mr_qty) AS total_mr_qty,
                       SUM(as_cast_qty) AS total_as_cast_qty,
                       SUM(COALESCE(total_amount, 0)) AS outward_amount
                FROM outward_stock
                GROUP BY item_id
            ) outw ON outw.item_id = it.id
            WHERE ($1::text IS NULL OR it.category ILIKE $1)
              AND ($2::bool IS NULL OR it.is_active = $2)
            ORDER BY it.category ASC, it.name ASC
            "#,
        )
        .bind(category.and_then(like_pattern))
        .bind(is_active)
        .fetch_all(&self.db)
        .await?;

        tracing::debug!(items = rows.len(), "Stock statement generated");
        Ok(StockStatement::new(rows))
    }

    /// Inward/outward summaries and item breakdown for one calendar month
    pub async fn monthly(
        &self,
        period: MonthPeriod,
        include_details: bool,
    ) -> AppResult<MonthlyReport> {
        let (start, end) = (period.start_date, period.end_date);

        let inward = sqlx::query_as::<_, InwardMonthSummary>(
            r#"
            SELECT COUNT(*) AS total_entries,
                   COALESCE(SUM(quantity_received), 0) AS total_quantity,
                   COALESCE(SUM(total_amount), 0) AS total_amount,
                   COUNT(DISTINCT supplier_id) AS supplier_count,
                   COUNT(DISTINCT item_id) AS item_count
            FROM inward_stock
            WHERE date BETWEEN $1 AND $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.db)
        .await?;

        let outward = sqlx::query_as::<_, OutwardMonthSummary>(
            r#"
            SELECT COUNT(*) AS total_entries,
                   COALESCE(SUM(total_qty), 0) AS total_quantity,
                   COALESCE(SUM(ok_qty), 0) AS total_ok_qty,
                   COALESCE(SUM(cr_qty), 0) AS total_cr_qty,
                   COALESCE(SUM(mr_qty), 0) AS total_mr_qty,
                   COALESCE(SUM(as_cast_qty), 0) AS total_as_cast_qty,
                   COALESCE(SUM(total_amount), 0) AS total_amount,
                   COUNT(DISTINCT customer_id) AS customer_count,
                   COUNT(DISTINCT item_id) AS item_count
            FROM outward_stock
            WHERE date BETWEEN $1 AND $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.db)
        .await?;

        let breakdown = sqlx::query_as::<_, ItemBreakdownRow>(
            r#"
            SELECT it.id AS item_id, it.name AS item_name,
                   it.category AS item_category, it.unit AS item_unit,
                   SUM(o.total_qty) AS total_quantity,
                   SUM(o.ok_qty) AS total_ok_qty,
                   SUM(o.cr_qty) AS total_cr_qty,
                   SUM(o.mr_qty) AS total_mr_qty,
                   SUM(o.as_cast_qty) AS total_as_cast_qty,
                   COALESCE(SUM(o.total_amount), 0) AS total_amount,
                   COUNT(*) AS entry_count
            FROM outward_stock o
            JOIN items it ON it.id = o.item_id
            WHERE o.date BETWEEN $1 AND $2
            GROUP BY it.id, it.name, it.category, it.unit
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        let (detailed_inward, detailed_outward) = if include_details {
            let inward_entries = sqlx::query_as::<_, InwardEntry>(&format!(
                "{INWARD_SELECT} WHERE i.date BETWEEN $1 AND $2 ORDER BY i.date DESC, i.created_at DESC"
            ))
            .bind(start)
            .bind(end)
            .fetch_all(&self.db)
            .await?;

            let outward_entries = sqlx::query_as::<_, OutwardEntry>(&format!(
                "{OUTWARD_SELECT} WHERE o.date BETWEEN $1 AND $2 ORDER BY o.date DESC, o.created_at DESC"
            ))
            .bind(start)
            .bind(end)
            .fetch_all(&self.db)
            .await?;

            (Some(inward_entries), Some(outward_entries))
        } else {
            (None, None)
        };

        tracing::debug!(period = %period.title(), "Monthly report generated");

        Ok(MonthlyReport {
            period,
            inward,
            outward,
            item_breakdown: finalize_breakdown(breakdown),
            detailed_inward,
            detailed_outward,
        })
    }

    /// Movements of one item, both directions, most recent first
    pub async fn item_history(
        &self,
        item_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        limit: Option<u32>,
    ) -> AppResult<ItemHistory> {
        validate_date_range(start_date, end_date)
            .map_err(|msg| AppError::validation("start_date", msg))?;
        let limit = match limit {
            None => self.history_default_limit,
            Some(_) => validate_history_limit(limit).map_err(|msg| AppError::validation("limit", msg))?,
        };

        let item = ItemService::new(self.db.clone()).get(item_id).await?;

        let inward = sqlx::query_as::<_, InwardEntry>(&format!(
            r#"
            {INWARD_SELECT}
            WHERE i.item_id = $1
              AND ($2::date IS NULL OR i.date >= $2)
              AND ($3::date IS NULL OR i.date <= $3)
            ORDER BY i.date DESC, i.created_at DESC
            LIMIT $4
            "#
        ))
        .bind(item_id)
        .bind(start_date)
        .bind(end_date)
        .bind(i64::from(limit))
        .fetch_all(&self.db)
        .await?;

        let outward = sqlx::query_as::<_, OutwardEntry>(&format!(
            r#"
            {OUTWARD_SELECT}
            WHERE o.item_id = $1
              AND ($2::date IS NULL OR o.date >= $2)
              AND ($3::date IS NULL OR o.date <= $3)
            ORDER BY o.date DESC, o.created_at DESC
            LIMIT $4
            "#
        ))
        .bind(item_id)
        .bind(start_date)
        .bind(end_date)
        .bind(i64::from(limit))
        .fetch_all(&self.db)
        .await?;

        Ok(ItemHistory::build(item, inward, outward, limit as usize))
    }

    /// Inward totals per supplier, highest amount first
    pub async fn supplier_performance(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> AppResult<Vec<SupplierPerformanceRow>> {
        validate_date_range(start_date, end_date)
            .map_err(|msg| AppError::validation("start_date", msg))?;

        let rows = sqlx::query_as::<_, SupplierPerformanceRow>(
            r#"
            SELECT s.id AS supplier_id, s.name AS supplier_name,
                   s.contact_person AS supplier_contact, s.email AS supplier_email,
                   s.phone AS supplier_phone,
                   COUNT(*) AS total_transactions,
                   SUM(i.quantity_received) AS total_quantity,
                   COALESCE(SUM(i.total_amount), 0) AS total_amount,
                   AVG(i.quantity_received) AS average_quantity,
                   COALESCE(AVG(i.total_amount), 0) AS average_amount,
                   MIN(i.date) AS first_transaction,
                   MAX(i.date) AS last_transaction
            FROM inward_stock i
            JOIN suppliers s ON s.id = i.supplier_id
            WHERE ($1::date IS NULL OR i.date >= $1)
              AND ($2::date IS NULL OR i.date <= $2)
            GROUP BY s.id, s.name, s.contact_person, s.email, s.phone
            ORDER BY total_amount DESC, s.name ASC
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(SupplierPerformanceRow::finalize).collect())
    }

    /// Outward totals per customer, highest amount first
    pub async fn customer_performance(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> AppResult<Vec<CustomerPerformanceRow>> {
        validate_date_range(start_date, end_date)
            .map_err(|msg| AppError::validation("start_date", msg))?;

        let rows = sqlx::query_as::<_, CustomerPerformanceRow>(
            r#"
            SELECT c.id AS customer_id, c.name AS customer_name,
                   c.contact_person AS customer_contact, c.email AS customer_email,
                   c.phone AS customer_phone,
                   COUNT(*) AS total_transactions,
                   SUM(o.total_qty) AS total_quantity,
                   SUM(o.ok_qty) AS total_ok_qty,
                   SUM(o.cr_qty) AS total_cr_qty,
                   SUM(o.mr_qty) AS total_mr_qty,
                   SUM(o.as_cast_qty) AS total_as_cast_qty,
                   COALESCE(SUM(o.total_amount), 0) AS total_amount,
                   AVG(o.total_qty) AS average_quantity,
                   COALESCE(AVG(o.total_amount), 0) AS average_amount,
                   MIN(o.date) AS first_transaction,
                   MAX(o.date) AS last_transaction
            FROM outward_stock o
            JOIN customers c ON c.id = o.customer_id
            WHERE ($1::date IS NULL OR o.date >= $1)
              AND ($2::date IS NULL OR o.date <= $2)
            GROUP BY c.id, c.name, c.contact_person, c.email, c.phone
            ORDER BY total_amount DESC, c.name ASC
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(CustomerPerformanceRow::finalize).collect())
    }
}
