//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use shared::{ActivityAction, ApiResponse, EntityType, RegisterInput, User};

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthSession, AuthTokens};
use crate::services::{ActivityService, AuthService, UserService};
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Register endpoint handler
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthSession>>)> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let session = auth_service.register(body).await?;

    ActivityService::new(state.db)
        .record_for(
            session.user.id,
            &session.user.name,
            ActivityAction::Create,
            EntityType::User,
            Some(session.user.id),
            None,
        )
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(session))))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthSession>>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let session = auth_service.login(&body.email, &body.password).await?;

    ActivityService::new(state.db)
        .record_for(
            session.user.id,
            &session.user.name,
            ActivityAction::Login,
            EntityType::User,
            Some(session.user.id),
            None,
        )
        .await;

    Ok(Json(ApiResponse::ok(session)))
}

/// Refresh token endpoint handler
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RefreshRequest>,
) -> AppResult<Json<ApiResponse<AuthTokens>>> {
    let auth_service = AuthService::new(state.db, &state.config);
    let tokens = auth_service.refresh_token(&body.refresh_token).await?;
    Ok(Json(ApiResponse::ok(tokens)))
}

/// Logout endpoint handler
pub async fn logout(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RefreshRequest>,
) -> AppResult<StatusCode> {
    let auth_service = AuthService::new(state.db, &state.config);
    auth_service.logout(&body.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Profile of the signed-in user
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = UserService::new(state.db).get(current_user.0.user_id).await?;
    Ok(Json(ApiResponse::ok(user)))
}
