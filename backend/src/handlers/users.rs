//! User administration handlers (admin only)

use axum::{extract::State, Json};
use serde_json::json;
use shared::{ActivityAction, ApiResponse, EntityType, UpdateUserInput, User};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::CurrentUser;
use crate::services::{ActivityService, UserService};
use crate::AppState;

/// List all accounts
pub async fn list_users(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<User>>>> {
    current_user.0.require_admin()?;
    let users = UserService::new(state.db).list().await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// Change an account's role or active flag
pub async fn update_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<UpdateUserInput>,
) -> AppResult<Json<ApiResponse<User>>> {
    current_user.0.require_admin()?;
    let details = json!({ "role": input.role, "is_active": input.is_active });

    let user = UserService::new(state.db.clone())
        .update(current_user.0.user_id, user_id, input)
        .await?;

    ActivityService::new(state.db)
        .record(&current_user.0, ActivityAction::Update, EntityType::User, Some(user.id), Some(details))
        .await;

    Ok(Json(ApiResponse::ok(user)))
}
