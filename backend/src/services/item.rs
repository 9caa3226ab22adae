//! Item master service
//!
//! `current_stock` is never written from item input; only inward and
//! outward entries move it, through `apply_stock_change`.

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{
    check_quantity, CreateItemInput, Item, Pagination, StockError, UpdateItemInput,
    DEFAULT_UNIT,
};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use validator::Validate;

use super::like_pattern;
use crate::error::{AppError, AppResult};

/// Item master service
#[derive(Clone)]
pub struct ItemService {
    db: PgPool,
}

/// Query filters for listing items
#[derive(Debug, Default, Deserialize)]
pub struct ItemFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
    pub low_stock: Option<bool>,
}

const ITEM_COLUMNS: &str = "id, name, description, category, unit, current_stock, minimum_stock, \
                            is_active, created_by, created_at, updated_at";

const ITEM_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR name ILIKE $1 OR description ILIKE $1)
      AND ($2::text IS NULL OR category ILIKE $2)
      AND ($3::bool IS NULL OR is_active = $3)
      AND ($4::bool IS NULL OR (current_stock <= minimum_stock) = $4)
"#;

impl ItemService {
    /// Create a new ItemService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List items ordered by name
    pub async fn list(&self, filter: &ItemFilter) -> AppResult<(Vec<Item>, u64, Pagination)> {
        let pagination = Pagination::from_query(filter.page, filter.limit);
        let search = filter.search.as_deref().and_then(like_pattern);
        let category = filter.category.as_deref().and_then(like_pattern);

        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items {ITEM_FILTER} ORDER BY name ASC LIMIT $5 OFFSET $6"
        ))
        .bind(&search)
        .bind(&category)
        .bind(filter.is_active)
        .bind(filter.low_stock)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM items {ITEM_FILTER}"))
            .bind(&search)
            .bind(&category)
            .bind(filter.is_active)
            .bind(filter.low_stock)
            .fetch_one(&self.db)
            .await?;

        Ok((items, total as u64, pagination))
    }

    /// Get one item
    pub async fn get(&self, item_id: Uuid) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"))
            .bind(item_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Item".to_string()))
    }

    /// Create an item with zero stock
    pub async fn create(&self, user_id: Uuid, input: CreateItemInput) -> AppResult<Item> {
        input.validate()?;
        let minimum_stock = input.minimum_stock.unwrap_or(Decimal::ZERO);
        check_minimum_stock(minimum_stock)?;

        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            INSERT INTO items (name, description, category, unit, minimum_stock, is_active, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(input.category.trim())
        .bind(input.unit.as_deref().unwrap_or(DEFAULT_UNIT))
        .bind(minimum_stock)
        .bind(input.is_active.unwrap_or(true))
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::unique_or(e, "name"))?;

        tracing::info!(item_id = %item.id, name = %item.name, "Item created");
        Ok(item)
    }

    /// Update item details
    pub async fn update(&self, item_id: Uuid, input: UpdateItemInput) -> AppResult<Item> {
        input.validate()?;
        if let Some(minimum_stock) = input.minimum_stock {
            check_minimum_stock(minimum_stock)?;
        }

        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            UPDATE items
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                unit = COALESCE($5, unit),
                minimum_stock = COALESCE($6, minimum_stock),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item_id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(&input.description)
        .bind(input.category.as_deref().map(str::trim))
        .bind(&input.unit)
        .bind(input.minimum_stock)
        .bind(input.is_active)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| AppError::unique_or(e, "name"))?
        .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

        tracing::info!(%item_id, "Item updated");
        Ok(item)
    }

    /// Delete an item that no stock entry references
    pub async fn delete(&self, item_id: Uuid) -> AppResult<Item> {
        let item = self.get(item_id).await?;

        let referenced = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM inward_stock WHERE item_id = $1)
                OR EXISTS(SELECT 1 FROM outward_stock WHERE item_id = $1)
            "#,
        )
        .bind(item_id)
        .fetch_one(&self.db)
        .await?;

        if referenced {
            return Err(AppError::Conflict {
                resource: "item".to_string(),
                message: "Item has stock entries and cannot be deleted".to_string(),
            });
        }

        sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(item_id)
            .execute(&self.db)
            .await?;

        tracing::info!(%item_id, "Item deleted");
        Ok(item)
    }

    /// Distinct categories, sorted
    pub async fn categories(&self) -> AppResult<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM items ORDER BY category",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(categories)
    }

    /// Active items at or below their minimum stock
    pub async fn low_stock(&self) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM items
            WHERE is_active = true AND current_stock <= minimum_stock
            ORDER BY (current_stock - minimum_stock) ASC, name ASC
            "#
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(items)
    }
}

fn check_minimum_stock(minimum_stock: Decimal) -> AppResult<()> {
    if minimum_stock < Decimal::ZERO {
        return Err(StockError::NegativeQuantity {
            field: "minimum_stock",
        }
        .into());
    }
    check_quantity("minimum_stock", minimum_stock)?;
    Ok(())
}

/// Lock an item row and move its stock level by `change`, inside the caller's transaction
pub(crate) async fn apply_stock_change<F>(
    conn: &mut PgConnection,
    item_id: Uuid,
    change: F,
) -> AppResult<Item>
where
    F: FnOnce(Decimal) -> Result<Decimal, StockError>,
{
    let current = sqlx::query_scalar::<_, Decimal>(
        "SELECT current_stock FROM items WHERE id = $1 FOR UPDATE",
    )
    .bind(item_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

    let next = change(current)?;

    let item = sqlx::query_as::<_, Item>(&format!(
        "UPDATE items SET current_stock = $2, updated_at = NOW() WHERE id = $1 RETURNING {ITEM_COLUMNS}"
    ))
    .bind(item_id)
    .bind(next)
    .fetch_one(&mut *conn)
    .await?;

    tracing::debug!(%item_id, from = %current, to = %next, "Stock level changed");
    Ok(item)
}
