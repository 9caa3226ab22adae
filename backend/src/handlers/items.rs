//! Item handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::json;
use shared::{
    ActivityAction, ApiResponse, CreateItemInput, EntityType, ItemView, PaginatedResponse,
    UpdateItemInput,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::services::item::ItemFilter;
use crate::services::{ActivityService, ItemService};
use crate::AppState;

/// List items with filters and pagination
pub async fn list_items(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ItemFilter>,
) -> AppResult<Json<PaginatedResponse<ItemView>>> {
    let (items, total, pagination) = ItemService::new(state.db).list(&filter).await?;
    let items = items.into_iter().map(ItemView::from).collect();
    Ok(Json(PaginatedResponse::new(items, total, pagination)))
}

/// Get one item
pub async fn get_item(
    State(state): State<AppState>,
    ApiPath(item_id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<ItemView>>> {
    let item = ItemService::new(state.db).get(item_id).await?;
    Ok(Json(ApiResponse::ok(item.into())))
}

/// Create an item
pub async fn create_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(input): ApiJson<CreateItemInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<ItemView>>)> {
    let item = ItemService::new(state.db.clone())
        .create(current_user.0.user_id, input)
        .await?;

    ActivityService::new(state.db)
        .record(
            &current_user.0,
            ActivityAction::Create,
            EntityType::Item,
            Some(item.id),
            Some(json!({ "name": item.name, "category": item.category })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(item.into()))))
}

/// Update an item's master data
pub async fn update_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(item_id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<UpdateItemInput>,
) -> AppResult<Json<ApiResponse<ItemView>>> {
    let item = ItemService::new(state.db.clone())
        .update(item_id, input)
        .await?;

    ActivityService::new(state.db)
        .record(
            &current_user.0,
            ActivityAction::Update,
            EntityType::Item,
            Some(item.id),
            Some(json!({ "name": item.name })),
        )
        .await;

    Ok(Json(ApiResponse::ok(item.into())))
}

/// Delete an unreferenced item (admin)
pub async fn delete_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(item_id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    current_user.0.require_admin()?;
    let item = ItemService::new(state.db.clone()).delete(item_id).await?;

    ActivityService::new(state.db)
        .record(
            &current_user.0,
            ActivityAction::Delete,
            EntityType::Item,
            Some(item.id),
            Some(json!({ "name": item.name })),
        )
        .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Distinct item categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    let categories = ItemService::new(state.db).categories().await?;
    Ok(Json(ApiResponse::ok(categories)))
}

/// Active items at or below their minimum
pub async fn list_low_stock(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<ItemView>>>> {
    let items = ItemService::new(state.db).low_stock().await?;
    Ok(Json(ApiResponse::ok(items.into_iter().map(ItemView::from).collect())))
}
