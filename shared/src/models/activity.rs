//! Activity log models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a user did
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "activity_action", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    Login,
    Create,
    Update,
    Delete,
    ReportGenerate,
    Export,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::Login => "LOGIN",
            ActivityAction::Create => "CREATE",
            ActivityAction::Update => "UPDATE",
            ActivityAction::Delete => "DELETE",
            ActivityAction::ReportGenerate => "REPORT_GENERATE",
            ActivityAction::Export => "EXPORT",
        }
    }
}

/// Kind of record an activity touched
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntityType {
    User,
    Item,
    Supplier,
    Customer,
    InwardStock,
    OutwardStock,
    Report,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::User => "User",
            EntityType::Item => "Item",
            EntityType::Supplier => "Supplier",
            EntityType::Customer => "Customer",
            EntityType::InwardStock => "InwardStock",
            EntityType::OutwardStock => "OutwardStock",
            EntityType::Report => "Report",
        }
    }
}

impl From<super::PartyKind> for EntityType {
    fn from(kind: super::PartyKind) -> Self {
        match kind {
            super::PartyKind::Supplier => EntityType::Supplier,
            super::PartyKind::Customer => EntityType::Customer,
        }
    }
}

/// A recorded user action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ActivityLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub user_name: Option<String>,
    pub action: ActivityAction,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
