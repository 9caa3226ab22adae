//! Inward and outward stock entry handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::json;
use shared::{
    ActivityAction, ApiResponse, CreateInwardInput, CreateOutwardInput, EntityType, InwardEntry,
    OutwardEntry, PaginatedResponse,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::services::inward::InwardFilter;
use crate::services::outward::OutwardFilter;
use crate::services::{ActivityService, InwardService, OutwardService};
use crate::AppState;

// ============================================================================
// Inward
// ============================================================================

/// Receive stock from a supplier
pub async fn create_inward(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(input): ApiJson<CreateInwardInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<InwardEntry>>)> {
    let entry = InwardService::new(state.db.clone(), &state.config.stock)
        .create(current_user.0.user_id, input)
        .await?;

    ActivityService::new(state.db)
        .record(
            &current_user.0,
            ActivityAction::Create,
            EntityType::InwardStock,
            Some(entry.id),
            Some(json!({
                "challan_no": entry.challan_no,
                "item": entry.item_name,
                "quantity": entry.quantity_received,
            })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(entry))))
}

pub async fn list_inward(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<InwardFilter>,
) -> AppResult<Json<PaginatedResponse<InwardEntry>>> {
    let (entries, total, pagination) = InwardService::new(state.db, &state.config.stock)
        .list(&filter)
        .await?;
    Ok(Json(PaginatedResponse::new(entries, total, pagination)))
}

pub async fn get_inward(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<InwardEntry>>> {
    let entry = InwardService::new(state.db, &state.config.stock).get(id).await?;
    Ok(Json(ApiResponse::ok(entry)))
}

/// Delete an inward entry and take its quantity back out of stock (admin)
pub async fn delete_inward(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    current_user.0.require_admin()?;
    let entry = InwardService::new(state.db.clone(), &state.config.stock)
        .delete(id)
        .await?;

    ActivityService::new(state.db)
        .record(
            &current_user.0,
            ActivityAction::Delete,
            EntityType::InwardStock,
            Some(entry.id),
            Some(json!({ "challan_no": entry.challan_no, "quantity": entry.quantity_received })),
        )
        .await;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Outward
// ============================================================================

/// Issue stock to a customer
pub async fn create_outward(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(input): ApiJson<CreateOutwardInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<OutwardEntry>>)> {
    let entry = OutwardService::new(state.db.clone(), &state.config.stock)
        .create(current_user.0.user_id, input)
        .await?;

    ActivityService::new(state.db)
        .record(
            &current_user.0,
            ActivityAction::Create,
            EntityType::OutwardStock,
            Some(entry.id),
            Some(json!({
                "challan_no": entry.challan_no,
                "item": entry.item_name,
                "total_qty": entry.total_qty,
            })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(entry))))
}

pub async fn list_outward(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<OutwardFilter>,
) -> AppResult<Json<PaginatedResponse<OutwardEntry>>> {
    let (entries, total, pagination) = OutwardService::new(state.db, &state.config.stock)
        .list(&filter)
        .await?;
    Ok(Json(PaginatedResponse::new(entries, total, pagination)))
}

pub async fn get_outward(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<OutwardEntry>>> {
    let entry = OutwardService::new(state.db, &state.config.stock).get(id).await?;
    Ok(Json(ApiResponse::ok(entry)))
}

/// Delete an outward entry and return its quantity to stock (admin)
pub async fn delete_outward(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    current_user.0.require_admin()?;
    let entry = OutwardService::new(state.db.clone(), &state.config.stock)
        .delete(id)
        .await?;

    ActivityService::new(state.db)
        .record(
            &current_user.0,
            ActivityAction::Delete,
            EntityType::OutwardStock,
            Some(entry.id),
            Some(json!({ "challan_no": entry.challan_no, "total_qty": entry.total_qty })),
        )
        .await;

    Ok(StatusCode::NO_CONTENT)
}
