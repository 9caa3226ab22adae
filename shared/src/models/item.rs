//! Item master models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Unit assigned to items created without one
pub const DEFAULT_UNIT: &str = "pcs";

/// A stocked item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub unit: String,
    pub current_stock: Decimal,
    pub minimum_stock: Decimal,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn is_low_stock(&self) -> bool {
        is_low_stock(self.current_stock, self.minimum_stock)
    }
}

/// An item is low on stock once it reaches its minimum level
pub fn is_low_stock(current_stock: Decimal, minimum_stock: Decimal) -> bool {
    current_stock <= minimum_stock
}

/// Item with its derived low-stock flag, as returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: Item,
    pub is_low_stock: bool,
}

impl From<Item> for ItemView {
    fn from(item: Item) -> Self {
        let is_low_stock = item.is_low_stock();
        Self { item, is_low_stock }
    }
}

/// Input for creating an item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateItemInput {
    #[validate(length(min = 1, max = 100, message = "Item name is required"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,
    pub minimum_stock: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Input for updating an item; stock level is not editable
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateItemInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,
    pub minimum_stock: Option<Decimal>,
    pub is_active: Option<bool>,
}
