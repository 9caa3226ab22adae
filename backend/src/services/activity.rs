//! Activity log service
//!
//! Recording never fails the request that triggered it; a write error is
//! only logged.

use serde::Deserialize;
use shared::{ActivityAction, ActivityLog, EntityType, Pagination};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::AuthUser;

/// Activity log service
#[derive(Clone)]
pub struct ActivityService {
    db: PgPool,
}

/// Filters for listing activity
#[derive(Debug, Default, Deserialize)]
pub struct ActivityFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub action: Option<ActivityAction>,
    pub entity_type: Option<String>,
    pub user_id: Option<Uuid>,
}

const ACTIVITY_COLUMNS: &str =
    "id, user_id, user_name, action, entity_type, entity_id, details, created_at";

impl ActivityService {
    /// Create a new ActivityService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an action taken by `user`
    pub async fn record(
        &self,
        user: &AuthUser,
        action: ActivityAction,
        entity_type: EntityType,
        entity_id: Option<Uuid>,
        details: Option<serde_json::Value>,
    ) {
        self.record_for(user.user_id, &user.name, action, entity_type, entity_id, details)
            .await
    }

    /// Record an action for a user that is not yet authenticated on this request
    pub async fn record_for(
        &self,
        user_id: Uuid,
        user_name: &str,
        action: ActivityAction,
        entity_type: EntityType,
        entity_id: Option<Uuid>,
        details: Option<serde_json::Value>,
    ) {
        let result = sqlx::query(
            r#"
            INSERT INTO activity_logs (user_id, user_name, action, entity_type, entity_id, details)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user_id)
        .bind(user_name)
        .bind(action)
        .bind(entity_type.as_str())
        .bind(entity_id)
        .bind(details)
        .execute(&self.db)
        .await;

        if let Err(e) = result {
            tracing::warn!(
                %user_id,
                action = action.as_str(),
                entity_type = entity_type.as_str(),
                "Failed to record activity: {}",
                e
            );
        }
    }

    /// List activity, most recent first
    pub async fn list(&self, filter: &ActivityFilter) -> AppResult<(Vec<ActivityLog>, u64)> {
        let pagination = Pagination::from_query(filter.page, filter.limit);

        let logs = sqlx::query_as::<_, ActivityLog>(&format!(
            r#"
            SELECT {ACTIVITY_COLUMNS}
            FROM activity_logs
            WHERE ($1::activity_action IS NULL OR action = $1)
              AND ($2::text IS NULL OR entity_type = $2)
              AND ($3::uuid IS NULL OR user_id = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(filter.action)
        .bind(&filter.entity_type)
        .bind(filter.user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM activity_logs
            WHERE ($1::activity_action IS NULL OR action = $1)
              AND ($2::text IS NULL OR entity_type = $2)
              AND ($3::uuid IS NULL OR user_id = $3)
            "#,
        )
        .bind(filter.action)
        .bind(&filter.entity_type)
        .bind(filter.user_id)
        .fetch_one(&self.db)
        .await?;

        Ok((logs, total as u64))
    }

    /// Most recent activity for the dashboard
    pub async fn recent(&self, limit: i64) -> AppResult<Vec<ActivityLog>> {
        let logs = sqlx::query_as::<_, ActivityLog>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity_logs ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.db)
        .await?;
        Ok(logs)
    }
}
