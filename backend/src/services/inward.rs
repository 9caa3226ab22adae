//! Inward (received) stock service

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{
    issue, receive, validate_date_range, CreateInwardInput, InwardEntry, Pagination,
    PartyKind,
};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;
use validator::Validate;

use super::item::apply_stock_change;
use crate::config::StockConfig;
use crate::error::{AppError, AppResult};

/// Inward stock service
#[derive(Clone)]
pub struct InwardService {
    db: PgPool,
    stock: StockConfig,
}

/// Query filters for listing inward entries
#[derive(Debug, Default, Deserialize)]
pub struct InwardFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub supplier_id: Option<Uuid>,
    pub item_id: Option<Uuid>,
}

pub(crate) const INWARD_SELECT: &str = r#"
    SELECT i.id, i.date, i.challan_no,
           i.supplier_id, s.name AS supplier_name, s.contact_person AS supplier_contact,
           i.item_id, it.name AS item_name, it.category AS item_category,
           i.quantity_received, i.unit, i.rate, i.total_amount, i.remarks,
           i.created_by, u.name AS created_by_name, i.created_at
    FROM inward_stock i
    JOIN suppliers s ON s.id = i.supplier_id
    JOIN items it ON it.id = i.item_id
    LEFT JOIN users u ON u.id = i.created_by
"#;

const INWARD_FILTER: &str = r#"
    WHERE ($1::date IS NULL OR i.date >= $1)
      AND ($2::date IS NULL OR i.date <= $2)
      AND ($3::uuid IS NULL OR i.supplier_id = $3)
      AND ($4::uuid IS NULL OR i.item_id = $4)
"#;

async fn fetch_entry<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> AppResult<Option<InwardEntry>> {
    let entry = sqlx::query_as::<_, InwardEntry>(&format!("{INWARD_SELECT} WHERE i.id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(entry)
}

impl InwardService {
    /// Create a new InwardService instance
    pub fn new(db: PgPool, stock: &StockConfig) -> Self {
        Self {
            db,
            stock: stock.clone(),
        }
    }

    /// Record a receipt and add it to the item's stock in one transaction
    pub async fn create(&self, user_id: Uuid, input: CreateInwardInput) -> AppResult<InwardEntry> {
        input.validate()?;
        let total_amount = input.check_quantities()?;

        let mut tx = self.db.begin().await?;

        let supplier_exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            PartyKind::Supplier.table()
        ))
        .bind(input.supplier_id)
        .fetch_one(&mut *tx)
        .await?;

        if !supplier_exists {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        let quantity = input.quantity_received;
        let item = apply_stock_change(&mut *tx, input.item_id, |current| receive(current, quantity))
            .await?;

        let date = input.date.unwrap_or_else(|| Utc::now().date_naive());
        let unit = input.unit.clone().unwrap_or_else(|| item.unit.clone());

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO inward_stock (
                date, challan_no, supplier_id, item_id, quantity_received,
                unit, rate, total_amount, remarks, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(date)
        .bind(input.challan_no.trim())
        .bind(input.supplier_id)
        .bind(input.item_id)
        .bind(quantity)
        .bind(&unit)
        .bind(input.rate)
        .bind(total_amount)
        .bind(&input.remarks)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let entry = fetch_entry(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::Internal("Inward entry vanished after insert".to_string()))?;

        tx.commit().await?;

        tracing::info!(
            inward_id = %id,
            item_id = %item.id,
            quantity = %quantity,
            stock = %item.current_stock,
            "Inward entry recorded"
        );

        Ok(entry)
    }

    /// List entries, most recent first
    pub async fn list(
        &self,
        filter: &InwardFilter,
    ) -> AppResult<(Vec<InwardEntry>, u64, Pagination)> {
        validate_date_range(filter.start_date, filter.end_date)
            .map_err(|msg| AppError::validation("start_date", msg))?;
        let pagination = Pagination::from_query(filter.page, filter.limit);

        let entries = sqlx::query_as::<_, InwardEntry>(&format!(
            "{INWARD_SELECT} {INWARD_FILTER} ORDER BY i.date DESC, i.created_at DESC LIMIT $5 OFFSET $6"
        ))
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.supplier_id)
        .bind(filter.item_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM inward_stock i {INWARD_FILTER}"
        ))
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.supplier_id)
        .bind(filter.item_id)
        .fetch_one(&self.db)
        .await?;

        Ok((entries, total as u64, pagination))
    }

    /// Get one entry
    pub async fn get(&self, id: Uuid) -> AppResult<InwardEntry> {
        fetch_entry(&self.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Inward entry".to_string()))
    }

    /// Delete an entry and take its quantity back out of stock
    pub async fn delete(&self, id: Uuid) -> AppResult<InwardEntry> {
        let mut tx = self.db.begin().await?;

        let entry = fetch_entry(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Inward entry".to_string()))?;

        let allow_negative = self.stock.allow_negative_stock;
        let quantity: Decimal = entry.quantity_received;
        let item = apply_stock_change(&mut *tx, entry.item_id, |current| {
            issue(current, quantity, allow_negative)
        })
        .await?;

        sqlx::query("DELETE FROM inward_stock WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(inward_id = %id, item_id = %item.id, stock = %item.current_stock, "Inward entry deleted");
        if self.stock.low_stock_alerts && item.is_low_stock() {
            tracing::warn!(item_id = %item.id, name = %item.name, stock = %item.current_stock, "Item is low on stock");
        }

        Ok(entry)
    }
}
