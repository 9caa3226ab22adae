//! Dashboard overview service

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{ActivityLog, MonthPeriod};
use sqlx::PgPool;

use super::activity::ActivityService;
use crate::error::AppResult;

/// Number of activities shown on the dashboard
pub const RECENT_ACTIVITY_LIMIT: i64 = 10;

/// Dashboard service
#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
}

/// Headline counts
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DashboardTotals {
    pub total_items: i64,
    pub total_suppliers: i64,
    pub total_customers: i64,
    pub total_inward_entries: i64,
    pub total_outward_entries: i64,
    pub low_stock_items: i64,
    pub month_inward_quantity: Decimal,
    pub month_outward_quantity: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub period: MonthPeriod,
    pub totals: DashboardTotals,
    pub recent_activities: Vec<ActivityLog>,
}

impl DashboardService {
    /// Create a new DashboardService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Totals for the current month plus the latest activity
    pub async fn overview(&self) -> AppResult<DashboardOverview> {
        let period = MonthPeriod::containing(Utc::now().date_naive());

        // One transaction so every count comes from the same snapshot
        let mut tx = self.db.begin().await?;

        let totals = sqlx::query_as::<_, DashboardTotals>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM items) AS total_items,
                (SELECT COUNT(*) FROM suppliers) AS total_suppliers,
                (SELECT COUNT(*) FROM customers) AS total_customers,
                (SELECT COUNT(*) FROM inward_stock) AS total_inward_entries,
                (SELECT COUNT(*) FROM outward_stock) AS total_outward_entries,
                (SELECT COUNT(*) FROM items
                  WHERE is_active = true AND current_stock <= minimum_stock) AS low_stock_items,
                (SELECT COALESCE(SUM(quantity_received), 0) FROM inward_stock
                  WHERE date BETWEEN $1 AND $2) AS month_inward_quantity,
                (SELECT COALESCE(SUM(total_qty), 0) FROM outward_stock
                  WHERE date BETWEEN $1 AND $2) AS month_outward_quantity
            "#,
        )
        .bind(period.start_date)
        .bind(period.end_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let recent_activities = ActivityService::new(self.db.clone())
            .recent(RECENT_ACTIVITY_LIMIT)
            .await?;

        Ok(DashboardOverview {
            period,
            totals,
            recent_activities,
        })
    }
}
