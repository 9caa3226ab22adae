//! Dashboard and activity log handlers

use axum::{extract::State, Json};
use shared::{ActivityLog, ApiResponse, PaginatedResponse, Pagination};

use crate::error::AppResult;
use crate::extract::ApiQuery;
use crate::middleware::CurrentUser;
use crate::services::activity::ActivityFilter;
use crate::services::dashboard::DashboardOverview;
use crate::services::{ActivityService, DashboardService};
use crate::AppState;

/// Totals and recent activity
pub async fn overview(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DashboardOverview>>> {
    let overview = DashboardService::new(state.db).overview().await?;
    Ok(Json(ApiResponse::ok(overview)))
}

/// Activity log, most recent first (admin)
pub async fn list_activity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiQuery(filter): ApiQuery<ActivityFilter>,
) -> AppResult<Json<PaginatedResponse<ActivityLog>>> {
    current_user.0.require_admin()?;
    let pagination = Pagination::from_query(filter.page, filter.limit);
    let (logs, total) = ActivityService::new(state.db).list(&filter).await?;
    Ok(Json(PaginatedResponse::new(logs, total, pagination)))
}
