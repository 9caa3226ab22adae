//! Outward (issued) stock models
//!
//! An issue splits its quantity into OK pieces, customer rejections (CR),
//! machining rejections (MR) and as-cast pieces. All four leave stock.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{check_quantity, check_rate, line_amount, StockError, MAX_QUANTITY};

/// Quantity split of an outward entry
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutwardQuantities {
    pub ok_qty: Decimal,
    pub cr_qty: Decimal,
    pub mr_qty: Decimal,
    pub as_cast_qty: Decimal,
}

impl OutwardQuantities {
    pub fn new(ok_qty: Decimal, cr_qty: Decimal, mr_qty: Decimal, as_cast_qty: Decimal) -> Self {
        Self {
            ok_qty,
            cr_qty,
            mr_qty,
            as_cast_qty,
        }
    }

    fn parts(&self) -> [(&'static str, Decimal); 4] {
        [
            ("ok_qty", self.ok_qty),
            ("cr_qty", self.cr_qty),
            ("mr_qty", self.mr_qty),
            ("as_cast_qty", self.as_cast_qty),
        ]
    }

    /// Sum of the four parts
    pub fn total(&self) -> Result<Decimal, StockError> {
        self.parts()
            .iter()
            .try_fold(Decimal::ZERO, |sum, (_, q)| sum.checked_add(*q))
            .filter(|t| t.abs() < MAX_QUANTITY)
            .ok_or(StockError::TooLarge { field: "total_qty" })
    }

    /// Each part non-negative and the total positive; returns the total
    pub fn validate(&self) -> Result<Decimal, StockError> {
        for (field, quantity) in self.parts() {
            if quantity < Decimal::ZERO {
                return Err(StockError::NegativeQuantity { field });
            }
            check_quantity(field, quantity)?;
        }
        let total = self.total()?;
        if total <= Decimal::ZERO {
            return Err(StockError::NonPositiveQuantity { field: "total_qty" });
        }
        Ok(total)
    }
}

/// Rejection percentage: (CR + MR) / total x 100, zero when nothing was issued
pub fn rejection_rate(total: Decimal, cr_qty: Decimal, mr_qty: Decimal) -> Decimal {
    if total > Decimal::ZERO {
        (cr_qty + mr_qty) / total * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// An issue of stock to a customer, joined with display names
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OutwardEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub challan_no: String,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub customer_contact: Option<String>,
    pub item_id: Uuid,
    pub item_name: String,
    pub item_category: String,
    pub ok_qty: Decimal,
    pub cr_qty: Decimal,
    pub mr_qty: Decimal,
    pub as_cast_qty: Decimal,
    pub total_qty: Decimal,
    pub unit: String,
    pub rate: Option<Decimal>,
    pub total_amount: Option<Decimal>,
    pub cr_reason: Option<String>,
    pub mr_reason: Option<String>,
    pub remarks: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording an outward entry; missing quantities count as zero
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOutwardInput {
    pub date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 50, message = "Challan number is required"))]
    pub challan_no: String,
    pub customer_id: Uuid,
    pub item_id: Uuid,
    #[serde(default)]
    pub ok_qty: Decimal,
    #[serde(default)]
    pub cr_qty: Decimal,
    #[serde(default)]
    pub mr_qty: Decimal,
    #[serde(default)]
    pub as_cast_qty: Decimal,
    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,
    pub rate: Option<Decimal>,
    #[validate(length(max = 200))]
    pub cr_reason: Option<String>,
    #[validate(length(max = 200))]
    pub mr_reason: Option<String>,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

impl CreateOutwardInput {
    pub fn quantities(&self) -> OutwardQuantities {
        OutwardQuantities::new(self.ok_qty, self.cr_qty, self.mr_qty, self.as_cast_qty)
    }

    /// Validates the split and rate; returns the total quantity
    pub fn check_quantities(&self) -> Result<Decimal, StockError> {
        let total = self.quantities().validate()?;
        check_rate(self.rate)?;
        Ok(total)
    }

    /// Total quantity and its line amount at the entered rate
    pub fn totals(&self) -> Result<(Decimal, Option<Decimal>), StockError> {
        let total = self.check_quantities()?;
        Ok((total, line_amount(total, self.rate)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(ok: i64, cr: i64, mr: i64, ac: i64) -> OutwardQuantities {
        OutwardQuantities::new(
            Decimal::from(ok),
            Decimal::from(cr),
            Decimal::from(mr),
            Decimal::from(ac),
        )
    }

    #[test]
    fn test_total_sums_all_parts() {
        assert_eq!(q(90, 4, 5, 1).total(), Ok(Decimal::from(100)));
    }

    #[test]
    fn test_validate_rejects_zero_total() {
        assert_eq!(
            q(0, 0, 0, 0).validate(),
            Err(StockError::NonPositiveQuantity { field: "total_qty" })
        );
    }

    #[test]
    fn test_validate_rejects_negative_part() {
        assert_eq!(
            q(10, -1, 0, 0).validate(),
            Err(StockError::NegativeQuantity { field: "cr_qty" })
        );
    }

    #[test]
    fn test_sub_precision_parts_are_rejected() {
        let tiny = Decimal::new(4, 4);
        let split = OutwardQuantities::new(tiny, tiny, tiny, tiny);
        assert_eq!(
            split.validate(),
            Err(StockError::TooPrecise {
                field: "ok_qty",
                scale: 3
            })
        );
    }

    #[test]
    fn test_oversized_parts_are_rejected() {
        assert_eq!(
            OutwardQuantities::new(Decimal::MAX, Decimal::MAX, Decimal::ZERO, Decimal::ZERO)
                .validate(),
            Err(StockError::TooLarge { field: "ok_qty" })
        );
        let near = Decimal::new(60_000_000_000, 0);
        assert_eq!(
            OutwardQuantities::new(near, near, Decimal::ZERO, Decimal::ZERO).validate(),
            Err(StockError::TooLarge { field: "total_qty" })
        );
    }

    #[test]
    fn test_totals_include_amount() {
        let json = serde_json::json!({
            "challan_no": "OUT-8",
            "customer_id": Uuid::new_v4(),
            "item_id": Uuid::new_v4(),
            "ok_qty": "9",
            "cr_qty": "1",
            "rate": "2.50",
        });
        let input: CreateOutwardInput = serde_json::from_value(json).unwrap();
        assert_eq!(
            input.totals(),
            Ok((Decimal::from(10), Some(Decimal::from(25))))
        );
    }

    #[test]
    fn test_rejection_rate() {
        assert_eq!(
            rejection_rate(Decimal::from(200), Decimal::from(6), Decimal::from(4)),
            Decimal::from(5)
        );
        assert_eq!(
            rejection_rate(Decimal::ZERO, Decimal::from(6), Decimal::from(4)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_missing_quantities_default_to_zero() {
        let json = serde_json::json!({
            "challan_no": "OUT-7",
            "customer_id": Uuid::new_v4(),
            "item_id": Uuid::new_v4(),
            "ok_qty": "12",
        });
        let input: CreateOutwardInput = serde_json::from_value(json).unwrap();
        assert_eq!(input.check_quantities(), Ok(Decimal::from(12)));
        assert_eq!(input.mr_qty, Decimal::ZERO);
    }
}
