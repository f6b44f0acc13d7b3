//! User routes
//!
//! Signup, token issuance and self-management of the authenticated user.
//! Password hashing and verification run on the blocking thread pool.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use recipe_api_shared::types::{
    CreateUserRequest, TokenRequest, TokenResponse, UpdateUserRequest, UserResponse,
};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_user))
        .route("/token", post(create_token))
        .route("/me", get(get_me).put(replace_me).patch(update_me))
}

/// POST /api/v1/user/create
async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = UserService::register(state.db(), req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/v1/user/token
async fn create_token(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let token = UserService::issue_token(state.db(), state.jwt(), req).await?;
    Ok(Json(token))
}

/// GET /api/v1/user/me
async fn get_me(auth: AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(&auth.user))
}

/// PUT /api/v1/user/me
async fn replace_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = UserService::replace_me(state.db(), &auth.user, req).await?;
    Ok(Json(user))
}

/// PATCH /api/v1/user/me
async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = UserService::update_me(state.db(), &auth.user, req).await?;
    Ok(Json(user))
}
