//! Outward (issued) stock service

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use shared::{
    issue, receive, validate_date_range, CreateOutwardInput, OutwardEntry, Pagination,
    PartyKind,
};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;
use validator::Validate;

use super::item::apply_stock_change;
use crate::config::StockConfig;
use crate::error::{AppError, AppResult};

/// Outward stock service
#[derive(Clone)]
pub struct OutwardService {
    db: PgPool,
    stock: StockConfig,
}

/// Query filters for listing outward entries
#[derive(Debug, Default, Deserialize)]
pub struct OutwardFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub customer_id: Option<Uuid>,
    pub item_id: Option<Uuid>,
}

pub(crate) const OUTWARD_SELECT: &str = r#"
    SELECT o.id, o.date, o.challan_no,
           o.customer_id, c.name AS customer_name, c.contact_person AS customer_contact,
           o.item_id, it.name AS item_name, it.category AS item_category,
           o.ok_qty, o.cr_qty, o.mr_qty, o.as_cast_qty, o.total_qty,
           o.unit, o.rate, o.total_amount, o.cr_reason, o.mr_reason, o.remarks,
           o.created_by, u.name AS created_by_name, o.created_at
    FROM outward_stock o
    JOIN customers c ON c.id = o.customer_id
    JOIN items it ON it.id = o.item_id
    LEFT JOIN users u ON u.id = o.created_by
"#;

const OUTWARD_FILTER: &str = r#"
    WHERE ($1::date IS NULL OR o.date >= $1)
      AND ($2::date IS NULL OR o.date <= $2)
      AND ($3::uuid IS NULL OR o.customer_id = $3)
      AND ($4::uuid IS NULL OR o.item_id = $4)
"#;

async fn fetch_entry<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> AppResult<Option<OutwardEntry>> {
    let entry = sqlx::query_as::<_, OutwardEntry>(&format!("{OUTWARD_SELECT} WHERE o.id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(entry)
}

impl OutwardService {
    /// Create a new OutwardService instance
    pub fn new(db: PgPool, stock: &StockConfig) -> Self {
        Self {
            db,
            stock: stock.clone(),
        }
    }

    /// Record an issue and take its total out of stock in one transaction
    pub async fn create(&self, user_id: Uuid, input: CreateOutwardInput) -> AppResult<OutwardEntry> {
        input.validate()?;
        let (total_qty, total_amount) = input.totals()?;

        let mut tx = self.db.begin().await?;

        let customer_exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            PartyKind::Customer.table()
        ))
        .bind(input.customer_id)
        .fetch_one(&mut *tx)
        .await?;

        if !customer_exists {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        let allow_negative = self.stock.allow_negative_stock;
        let item = apply_stock_change(&mut *tx, input.item_id, |current| {
            issue(current, total_qty, allow_negative)
        })
        .await?;

        let date = input.date.unwrap_or_else(|| Utc::now().date_naive());
        let unit = input.unit.clone().unwrap_or_else(|| item.unit.clone());

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO outward_stock (
                date, challan_no, customer_id, item_id,
                ok_qty, cr_qty, mr_qty, as_cast_qty, total_qty,
                unit, rate, total_amount, cr_reason, mr_reason, remarks, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id
            "#,
        )
        .bind(date)
        .bind(input.challan_no.trim())
        .bind(input.customer_id)
        .bind(input.item_id)
        .bind(input.ok_qty)
        .bind(input.cr_qty)
        .bind(input.mr_qty)
        .bind(input.as_cast_qty)
        .bind(total_qty)
        .bind(&unit)
        .bind(input.rate)
        .bind(total_amount)
        .bind(&input.cr_reason)
        .bind(&input.mr_reason)
        .bind(&input.remarks)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let entry = fetch_entry(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::Internal("Outward entry vanished after insert".to_string()))?;

        tx.commit().await?;

        tracing::info!(
            outward_id = %id,
            item_id = %item.id,
            total_qty = %total_qty,
            stock = %item.current_stock,
            "Outward entry recorded"
        );
        if self.stock.low_stock_alerts && item.is_low_stock() {
            tracing::warn!(item_id = %item.id, name = %item.name, stock = %item.current_stock, "Item is low on stock");
        }

        Ok(entry)
    }

    /// List entries, most recent first
    pub async fn list(
        &self,
        filter: &OutwardFilter,
    ) -> AppResult<(Vec<OutwardEntry>, u64, Pagination)> {
        validate_date_range(filter.start_date, filter.end_date)
            .map_err(|msg| AppError::validation("start_date", msg))?;
        let pagination = Pagination::from_query(filter.page, filter.limit);

        let entries = sqlx::query_as::<_, OutwardEntry>(&format!(
            "{OUTWARD_SELECT} {OUTWARD_FILTER} ORDER BY o.date DESC, o.created_at DESC LIMIT $5 OFFSET $6"
        ))
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.customer_id)
        .bind(filter.item_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM outward_stock o {OUTWARD_FILTER}"
        ))
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.customer_id)
        .bind(filter.item_id)
        .fetch_one(&self.db)
        .await?;

        Ok((entries, total as u64, pagination))
    }

    /// Get one entry
    pub async fn get(&self, id: Uuid) -> AppResult<OutwardEntry> {
        fetch_entry(&self.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Outward entry".to_string()))
    }

    /// Delete an entry and return its quantity to stock
    pub async fn delete(&self, id: Uuid) -> AppResult<OutwardEntry> {
        let mut tx = self.db.begin().await?;

        let entry = fetch_entry(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Outward entry".to_string()))?;

        let quantity = entry.total_qty;
        let item = apply_stock_change(&mut *tx, entry.item_id, |current| receive(current, quantity))
            .await?;

        sqlx::query("DELETE FROM outward_stock WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(outward_id = %id, item_id = %item.id, stock = %item.current_stock, "Outward entry deleted");
        Ok(entry)
    }
}
