//! Inward (received) stock models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{check_quantity, check_rate, line_amount, StockError};

/// A receipt of stock from a supplier, joined with display names
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InwardEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub challan_no: String,
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub supplier_contact: Option<String>,
    pub item_id: Uuid,
    pub item_name: String,
    pub item_category: String,
    pub quantity_received: Decimal,
    pub unit: String,
    pub rate: Option<Decimal>,
    pub total_amount: Option<Decimal>,
    pub remarks: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording an inward entry
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInwardInput {
    pub date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 50, message = "Challan number is required"))]
    pub challan_no: String,
    pub supplier_id: Uuid,
    pub item_id: Uuid,
    pub quantity_received: Decimal,
    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,
    pub rate: Option<Decimal>,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

impl CreateInwardInput {
    /// Quantity and rate rules the derive cannot express for decimals;
    /// returns the line amount
    pub fn check_quantities(&self) -> Result<Option<Decimal>, StockError> {
        if self.quantity_received <= Decimal::ZERO {
            return Err(StockError::NonPositiveQuantity {
                field: "quantity_received",
            });
        }
        check_quantity("quantity_received", self.quantity_received)?;
        check_rate(self.rate)?;
        line_amount(self.quantity_received, self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(quantity: i64, rate: Option<i64>) -> CreateInwardInput {
        CreateInwardInput {
            date: None,
            challan_no: "CH-001".into(),
            supplier_id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            quantity_received: Decimal::from(quantity),
            unit: None,
            rate: rate.map(Decimal::from),
            remarks: None,
        }
    }

    #[test]
    fn test_quantity_must_be_positive() {
        assert!(input(5, None).check_quantities().is_ok());
        assert_eq!(
            input(0, None).check_quantities().unwrap_err().field(),
            Some("quantity_received")
        );
    }

    #[test]
    fn test_amount_is_quantity_times_stored_rate() {
        let mut entry = input(3, None);
        entry.rate = Some(Decimal::new(256, 2));
        assert_eq!(entry.check_quantities(), Ok(Some(Decimal::new(768, 2))));

        entry.rate = Some(Decimal::new(2_555, 3));
        assert_eq!(
            entry.check_quantities(),
            Err(StockError::TooPrecise {
                field: "rate",
                scale: 2
            })
        );
    }

    #[test]
    fn test_oversized_quantity_is_a_validation_error() {
        let entry: CreateInwardInput = serde_json::from_value(serde_json::json!({
            "challan_no": "IN-9",
            "supplier_id": Uuid::new_v4(),
            "item_id": Uuid::new_v4(),
            "quantity_received": "79228162514264337593543950",
            "rate": "100000",
        }))
        .unwrap();
        assert!(entry.validate().is_ok());
        assert_eq!(
            entry.check_quantities(),
            Err(StockError::TooLarge {
                field: "quantity_received"
            })
        );
    }

    #[test]
    fn test_quantity_precision_is_bounded() {
        let mut entry = input(1, None);
        entry.quantity_received = Decimal::new(12_345, 4);
        assert_eq!(
            entry.check_quantities().unwrap_err().field(),
            Some("quantity_received")
        );
    }

    #[test]
    fn test_rate_cannot_be_negative() {
        assert!(input(5, Some(0)).check_quantities().is_ok());
        assert_eq!(
            input(5, Some(-1)).check_quantities().unwrap_err().field(),
            Some("rate")
        );
    }
}
