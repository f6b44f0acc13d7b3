//! Staff-only user administration routes

use crate::auth::StaffUser;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::services::AdminService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use recipe_api_shared::types::{
    AdminAddUserRequest, AdminUpdateUserRequest, AdminUserDetail, AdminUserListItem,
};
use uuid::Uuid;

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(add_user))
        .route("/users/add", get(add_form))
        .route("/users/:id", get(get_user).patch(update_user))
}

/// GET /api/v1/admin/users
async fn list_users(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> ApiResult<Json<Vec<AdminUserListItem>>> {
    let users = AdminService::list(state.db(), state.admin()).await?;
    Ok(Json(users))
}

/// GET /api/v1/admin/users/add - field names accepted by the add view
async fn add_form(State(state): State<AppState>, _staff: StaffUser) -> Json<Vec<String>> {
    Json(AdminService::add_form(state.admin()))
}

/// POST /api/v1/admin/users
async fn add_user(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    ApiJson(req): ApiJson<AdminAddUserRequest>,
) -> ApiResult<(StatusCode, Json<AdminUserDetail>)> {
    let user = AdminService::add(state.db(), state.admin(), req).await?;
    tracing::info!(staff_id = %staff.user_id(), user_id = %user.id, "User added by staff");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/admin/users/:id
async fn get_user(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AdminUserDetail>> {
    let user = AdminService::detail(state.db(), state.admin(), id).await?;
    Ok(Json(user))
}

/// PATCH /api/v1/admin/users/:id
async fn update_user(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<AdminUpdateUserRequest>,
) -> ApiResult<Json<AdminUserDetail>> {
    let user = AdminService::update(state.db(), state.admin(), id, req).await?;
    Ok(Json(user))
}
