//! Stock level arithmetic shared by inward and outward entries

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Decimal places stored for quantities, NUMERIC(14, 3)
pub const QUANTITY_SCALE: u32 = 3;
/// Decimal places stored for rates and amounts, NUMERIC(14, 2) and NUMERIC(16, 2)
pub const AMOUNT_SCALE: u32 = 2;

/// Exclusive bound for quantities and stock levels (10^11)
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(0x4876_E800, 0x17, 0, false, 0);
/// Exclusive bound for rates (10^12)
pub const MAX_RATE: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);
/// Exclusive bound for line amounts (10^14)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x107A_4000, 0x5AF3, 0, false, 0);

/// Rule violations when moving stock
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    #[error("{field} must be greater than zero")]
    NonPositiveQuantity { field: &'static str },

    #[error("{field} cannot be negative")]
    NegativeQuantity { field: &'static str },

    #[error("{field} is too large")]
    TooLarge { field: &'static str },

    #[error("{field} allows at most {scale} decimal places")]
    TooPrecise { field: &'static str, scale: u32 },

    #[error("Insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: Decimal, requested: Decimal },
}

impl StockError {
    /// Offending input field, when the error is tied to one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            StockError::NonPositiveQuantity { field }
            | StockError::NegativeQuantity { field }
            | StockError::TooLarge { field }
            | StockError::TooPrecise { field, .. } => Some(field),
            StockError::InsufficientStock { .. } => None,
        }
    }
}

fn check_bounded(
    field: &'static str,
    value: Decimal,
    scale: u32,
    max: Decimal,
) -> Result<Decimal, StockError> {
    if value.abs() >= max {
        return Err(StockError::TooLarge { field });
    }
    if value.normalize().scale() > scale {
        return Err(StockError::TooPrecise { field, scale });
    }
    Ok(value)
}

/// A quantity that fits a NUMERIC(14, 3) column
pub fn check_quantity(field: &'static str, value: Decimal) -> Result<Decimal, StockError> {
    check_bounded(field, value, QUANTITY_SCALE, MAX_QUANTITY)
}

/// A rate that fits a NUMERIC(14, 2) column and is not negative
pub fn check_rate(rate: Option<Decimal>) -> Result<(), StockError> {
    match rate {
        Some(r) if r < Decimal::ZERO => Err(StockError::NegativeQuantity { field: "rate" }),
        Some(r) => check_bounded("rate", r, AMOUNT_SCALE, MAX_RATE).map(|_| ()),
        None => Ok(()),
    }
}

/// Stock level after receiving `quantity`
pub fn receive(current: Decimal, quantity: Decimal) -> Result<Decimal, StockError> {
    if quantity <= Decimal::ZERO {
        return Err(StockError::NonPositiveQuantity {
            field: "quantity_received",
        });
    }
    let next = current
        .checked_add(quantity)
        .ok_or(StockError::TooLarge { field: "current_stock" })?;
    check_quantity("current_stock", next)
}

/// Stock level after issuing `quantity`
pub fn issue(
    current: Decimal,
    quantity: Decimal,
    allow_negative: bool,
) -> Result<Decimal, StockError> {
    if quantity <= Decimal::ZERO {
        return Err(StockError::NonPositiveQuantity { field: "total_qty" });
    }
    let remaining = current
        .checked_sub(quantity)
        .ok_or(StockError::TooLarge { field: "current_stock" })?;
    if remaining < Decimal::ZERO && !allow_negative {
        return Err(StockError::InsufficientStock {
            available: current,
            requested: quantity,
        });
    }
    check_quantity("current_stock", remaining)
}

/// Line amount for a quantity at an optional rate, rounded as the amount column stores it
pub fn line_amount(quantity: Decimal, rate: Option<Decimal>) -> Result<Option<Decimal>, StockError> {
    let Some(rate) = rate else {
        return Ok(None);
    };
    let amount = quantity
        .checked_mul(rate)
        .filter(|a| a.abs() < MAX_AMOUNT)
        .ok_or(StockError::TooLarge {
            field: "total_amount",
        })?;
    Ok(Some(amount.round_dp_with_strategy(
        AMOUNT_SCALE,
        RoundingStrategy::MidpointAwayFromZero,
    )))
}
