//! WebAssembly module for the Stock Tracker forms
//!
//! Provides client-side computation for:
//! - Outward quantity totals and validation
//! - Rejection rates
//! - Low-stock flags and line amounts
//!
//! Quantities cross the boundary as decimal strings so the browser shows
//! exactly what the server will store.

use std::str::FromStr;

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Blank input counts as zero, like an untouched form field
fn parse_qty(field: &str, value: &str) -> Result<Decimal, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(value).map_err(|_| format!("{} must be a number", field))
}

fn parse_quantities(
    ok_qty: &str,
    cr_qty: &str,
    mr_qty: &str,
    as_cast_qty: &str,
) -> Result<OutwardQuantities, String> {
    Ok(OutwardQuantities::new(
        parse_qty("ok_qty", ok_qty)?,
        parse_qty("cr_qty", cr_qty)?,
        parse_qty("mr_qty", mr_qty)?,
        parse_qty("as_cast_qty", as_cast_qty)?,
    ))
}

fn to_js(err: String) -> JsValue {
    JsValue::from_str(&err)
}

/// Total issued quantity (OK + CR + MR + As Cast)
#[wasm_bindgen]
pub fn outward_total_qty(
    ok_qty: &str,
    cr_qty: &str,
    mr_qty: &str,
    as_cast_qty: &str,
) -> Result<String, JsValue> {
    let quantities = parse_quantities(ok_qty, cr_qty, mr_qty, as_cast_qty).map_err(to_js)?;
    let total = quantities.total().map_err(|e| to_js(e.to_string()))?;
    Ok(total.to_string())
}

/// Error message for an invalid split, `None` when the split can be submitted
#[wasm_bindgen]
pub fn validate_outward_quantities(
    ok_qty: &str,
    cr_qty: &str,
    mr_qty: &str,
    as_cast_qty: &str,
) -> Option<String> {
    match parse_quantities(ok_qty, cr_qty, mr_qty, as_cast_qty) {
        Ok(quantities) => quantities.validate().err().map(|e| e.to_string()),
        Err(message) => Some(message),
    }
}

/// Rejection percentage rounded to two places
#[wasm_bindgen]
pub fn rejection_rate(total_qty: &str, cr_qty: &str, mr_qty: &str) -> Result<String, JsValue> {
    let total = parse_qty("total_qty", total_qty).map_err(to_js)?;
    let cr = parse_qty("cr_qty", cr_qty).map_err(to_js)?;
    let mr = parse_qty("mr_qty", mr_qty).map_err(to_js)?;
    Ok(round2(shared::rejection_rate(total, cr, mr)).to_string())
}

/// Whether stock has reached its minimum
#[wasm_bindgen]
pub fn is_low_stock(current_stock: &str, minimum_stock: &str) -> Result<bool, JsValue> {
    let current = parse_qty("current_stock", current_stock).map_err(to_js)?;
    let minimum = parse_qty("minimum_stock", minimum_stock).map_err(to_js)?;
    Ok(shared::is_low_stock(current, minimum))
}

/// Quantity times rate; empty string when no rate is entered
#[wasm_bindgen]
pub fn line_amount(quantity: &str, rate: &str) -> Result<String, JsValue> {
    let quantity = parse_qty("quantity", quantity).map_err(to_js)?;
    let rate = match rate.trim() {
        "" => None,
        raw => Some(parse_qty("rate", raw).map_err(to_js)?),
    };
    let amount = shared::line_amount(quantity, rate).map_err(|e| to_js(e.to_string()))?;
    Ok(amount.map(|a| a.to_string()).unwrap_or_default())
}

/// English month name for 1-12
#[wasm_bindgen]
pub fn month_name(month: u32) -> Option<String> {
    shared::month_name(month).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outward_total_qty() {
        assert_eq!(outward_total_qty("10", "2", "1.5", "").unwrap(), "13.5");
    }

    #[test]
    fn test_validate_outward_quantities() {
        assert_eq!(validate_outward_quantities("5", "0", "0", "0"), None);
        assert_eq!(
            validate_outward_quantities("0", "0", "0", "0").as_deref(),
            Some("total_qty must be greater than zero")
        );
        assert_eq!(
            validate_outward_quantities("5", "-1", "0", "0").as_deref(),
            Some("cr_qty cannot be negative")
        );
        assert_eq!(
            validate_outward_quantities("five", "0", "0", "0").as_deref(),
            Some("ok_qty must be a number")
        );
        assert_eq!(
            validate_outward_quantities("0.0005", "0", "0", "0").as_deref(),
            Some("ok_qty allows at most 3 decimal places")
        );
    }

    #[test]
    fn test_rejection_rate() {
        assert_eq!(rejection_rate("200", "10", "5").unwrap(), "7.50");
        assert_eq!(rejection_rate("0", "0", "0").unwrap(), "0");
    }

    #[test]
    fn test_is_low_stock() {
        assert!(is_low_stock("5", "5").unwrap());
        assert!(!is_low_stock("6", "5").unwrap());
    }

    #[test]
    fn test_line_amount() {
        assert_eq!(line_amount("4", "2.5").unwrap(), "10.0");
        assert_eq!(line_amount("0.333", "10.15").unwrap(), "3.38");
        assert_eq!(line_amount("4", "").unwrap(), "");
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(11).as_deref(), Some("November"));
        assert_eq!(month_name(0), None);
    }

    #[test]
    fn test_parse_qty_blank_is_zero() {
        assert_eq!(parse_qty("ok_qty", "  ").unwrap(), Decimal::ZERO);
        assert!(parse_qty("ok_qty", "x").is_err());
    }
}
