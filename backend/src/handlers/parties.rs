//! Supplier and customer handlers
//!
//! Both resources share one service; each route picks its `PartyKind`.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::json;
use shared::{
    ActivityAction, ApiResponse, CreatePartyInput, PaginatedResponse, Party, PartyKind,
    UpdatePartyInput,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{AuthUser, CurrentUser};
use crate::services::party::PartyFilter;
use crate::services::{ActivityService, PartyService};
use crate::AppState;

async fn list(
    state: AppState,
    kind: PartyKind,
    filter: PartyFilter,
) -> AppResult<Json<PaginatedResponse<Party>>> {
    let (parties, total, pagination) = PartyService::new(state.db, kind).list(&filter).await?;
    Ok(Json(PaginatedResponse::new(parties, total, pagination)))
}

async fn get(state: AppState, kind: PartyKind, id: Uuid) -> AppResult<Json<ApiResponse<Party>>> {
    let party = PartyService::new(state.db, kind).get(id).await?;
    Ok(Json(ApiResponse::ok(party)))
}

async fn create(
    state: AppState,
    kind: PartyKind,
    user: &AuthUser,
    input: CreatePartyInput,
) -> AppResult<(StatusCode, Json<ApiResponse<Party>>)> {
    let party = PartyService::new(state.db.clone(), kind).create(input).await?;

    ActivityService::new(state.db)
        .record(
            user,
            ActivityAction::Create,
            kind.into(),
            Some(party.id),
            Some(json!({ "name": party.name })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(party))))
}

async fn update(
    state: AppState,
    kind: PartyKind,
    user: &AuthUser,
    id: Uuid,
    input: UpdatePartyInput,
) -> AppResult<Json<ApiResponse<Party>>> {
    let party = PartyService::new(state.db.clone(), kind)
        .update(id, input)
        .await?;

    ActivityService::new(state.db)
        .record(
            user,
            ActivityAction::Update,
            kind.into(),
            Some(party.id),
            Some(json!({ "name": party.name })),
        )
        .await;

    Ok(Json(ApiResponse::ok(party)))
}

async fn delete(state: AppState, kind: PartyKind, user: &AuthUser, id: Uuid) -> AppResult<StatusCode> {
    user.require_admin()?;
    let party = PartyService::new(state.db.clone(), kind).delete(id).await?;

    ActivityService::new(state.db)
        .record(
            user,
            ActivityAction::Delete,
            kind.into(),
            Some(party.id),
            Some(json!({ "name": party.name })),
        )
        .await;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Suppliers
// ============================================================================

pub async fn list_suppliers(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<PartyFilter>,
) -> AppResult<Json<PaginatedResponse<Party>>> {
    list(state, PartyKind::Supplier, filter).await
}

pub async fn get_supplier(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Party>>> {
    get(state, PartyKind::Supplier, id).await
}

pub async fn create_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(input): ApiJson<CreatePartyInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Party>>)> {
    create(state, PartyKind::Supplier, &current_user.0, input).await
}

pub async fn update_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<UpdatePartyInput>,
) -> AppResult<Json<ApiResponse<Party>>> {
    update(state, PartyKind::Supplier, &current_user.0, id, input).await
}

pub async fn delete_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    delete(state, PartyKind::Supplier, &current_user.0, id).await
}

// ============================================================================
// Customers
// ============================================================================

pub async fn list_customers(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<PartyFilter>,
) -> AppResult<Json<PaginatedResponse<Party>>> {
    list(state, PartyKind::Customer, filter).await
}

pub async fn get_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Party>>> {
    get(state, PartyKind::Customer, id).await
}

pub async fn create_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(input): ApiJson<CreatePartyInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Party>>)> {
    create(state, PartyKind::Customer, &current_user.0, input).await
}

pub async fn update_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<UpdatePartyInput>,
) -> AppResult<Json<ApiResponse<Party>>> {
    update(state, PartyKind::Customer, &current_user.0, id, input).await
}

pub async fn delete_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    delete(state, PartyKind::Customer, &current_user.0, id).await
}
