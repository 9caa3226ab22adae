//! Supplier and customer models
//!
//! Suppliers and customers share one shape; `PartyKind` tells them apart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Which side of a stock movement a party sits on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
    Supplier,
    Customer,
}

impl PartyKind {
    /// Backing table
    pub fn table(&self) -> &'static str {
        match self {
            PartyKind::Supplier => "suppliers",
            PartyKind::Customer => "customers",
        }
    }

    /// Stock table and column that reference this party
    pub fn referencing(&self) -> (&'static str, &'static str) {
        match self {
            PartyKind::Supplier => ("inward_stock", "supplier_id"),
            PartyKind::Customer => ("outward_stock", "customer_id"),
        }
    }

    /// Display name used in messages and activity logs
    pub fn label(&self) -> &'static str {
        match self {
            PartyKind::Supplier => "Supplier",
            PartyKind::Customer => "Customer",
        }
    }
}

/// A supplier or customer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Party {
    pub id: Uuid,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a supplier or customer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePartyInput {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 100))]
    pub contact_person: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
}

/// Input for updating a supplier or customer
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePartyInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub contact_person: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_kind_tables() {
        assert_eq!(PartyKind::Supplier.table(), "suppliers");
        assert_eq!(PartyKind::Customer.referencing(), ("outward_stock", "customer_id"));
    }

    #[test]
    fn test_optional_email_validated_when_present() {
        let mut input = CreatePartyInput {
            name: "Shree Castings".into(),
            contact_person: None,
            email: None,
            phone: None,
            address: None,
        };
        assert!(input.validate().is_ok());

        input.email = Some("nope".into());
        assert!(input.validate().is_err());
    }
}
