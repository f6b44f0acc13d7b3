//! Recipe API routes
//!
//! Every route requires authentication and only ever sees the caller's own
//! recipes; someone else's recipe id answers 404.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::services::RecipeService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use recipe_api_shared::types::{RecipeDetail, RecipePatchRequest, RecipeRequest, RecipeSummary};

/// Create recipe routes
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes).post(create_recipe))
        .route(
            "/:id",
            get(get_recipe)
                .put(replace_recipe)
                .patch(update_recipe)
                .delete(delete_recipe),
        )
}

/// GET /api/v1/recipes - newest first
async fn list_recipes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<RecipeSummary>>> {
    let recipes = RecipeService::list(state.db(), auth.user_id()).await?;
    Ok(Json(recipes))
}

/// POST /api/v1/recipes
async fn create_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<RecipeRequest>,
) -> ApiResult<(StatusCode, Json<RecipeDetail>)> {
    let recipe = RecipeService::create(state.db(), auth.user_id(), req).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// GET /api/v1/recipes/:id
async fn get_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<RecipeDetail>> {
    let recipe = RecipeService::get(state.db(), auth.user_id(), id).await?;
    Ok(Json(recipe))
}

/// PUT /api/v1/recipes/:id
async fn replace_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<RecipeRequest>,
) -> ApiResult<Json<RecipeDetail>> {
    let recipe = RecipeService::replace(state.db(), auth.user_id(), id, req).await?;
    Ok(Json(recipe))
}

/// PATCH /api/v1/recipes/:id
async fn update_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<RecipePatchRequest>,
) -> ApiResult<Json<RecipeDetail>> {
    let recipe = RecipeService::update(state.db(), auth.user_id(), id, req).await?;
    Ok(Json(recipe))
}

/// DELETE /api/v1/recipes/:id
async fn delete_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    RecipeService::delete(state.db(), auth.user_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
