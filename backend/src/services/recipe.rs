//! Recipe service
//!
//! Validates input, converts between API types and records, and keeps all
//! access scoped to the requesting user.

use crate::error::ApiError;
use crate::repositories::{CreateRecipe, RecipeChanges, RecipeRecord, RecipeRepository};
use recipe_api_shared::types::{RecipeDetail, RecipePatchRequest, RecipeRequest, RecipeSummary};
use recipe_api_shared::validation::{
    validate_link, validate_price, validate_time_minutes, validate_title,
};
use recipe_api_shared::ValidationError;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

impl From<RecipeRecord> for RecipeSummary {
    fn from(r: RecipeRecord) -> Self {
        RecipeSummary {
            id: r.id,
            title: r.title,
            time_minutes: r.time_minutes,
            price: r.price,
            link: r.link,
        }
    }
}

impl From<RecipeRecord> for RecipeDetail {
    fn from(r: RecipeRecord) -> Self {
        RecipeDetail {
            id: r.id,
            title: r.title,
            time_minutes: r.time_minutes,
            price: r.price,
            link: r.link,
            description: r.description,
        }
    }
}

/// Validate a full recipe payload
pub fn validate_recipe(req: &RecipeRequest) -> Result<(), ValidationError> {
    validate_title(&req.title)?;
    validate_time_minutes(req.time_minutes)?;
    validate_price(req.price)?;
    validate_link(&req.link)?;
    Ok(())
}

/// Validate only the fields present in a partial payload
pub fn validate_recipe_patch(req: &RecipePatchRequest) -> Result<(), ValidationError> {
    if let Some(title) = &req.title {
        validate_title(title)?;
    }
    if let Some(minutes) = req.time_minutes {
        validate_time_minutes(minutes)?;
    }
    if let Some(price) = req.price {
        validate_price(price)?;
    }
    if let Some(link) = &req.link {
        validate_link(link)?;
    }
    Ok(())
}

fn not_found() -> ApiError {
    ApiError::NotFound("Recipe not found".to_string())
}

/// Recipe service
pub struct RecipeService;

impl RecipeService {
    /// List the user's recipes, newest first
    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<RecipeSummary>, ApiError> {
        let recipes = RecipeRepository::list_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(recipes.into_iter().map(RecipeSummary::from).collect())
    }

    /// Get one of the user's recipes
    pub async fn get(pool: &PgPool, user_id: Uuid, id: i64) -> Result<RecipeDetail, ApiError> {
        RecipeRepository::find_for_user(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .map(RecipeDetail::from)
            .ok_or_else(not_found)
    }

    /// Create a recipe owned by the user
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        req: RecipeRequest,
    ) -> Result<RecipeDetail, ApiError> {
        validate_recipe(&req)?;

        let recipe = RecipeRepository::create(
            pool,
            CreateRecipe {
                user_id,
                title: req.title,
                time_minutes: req.time_minutes,
                price: req.price.round_dp(2),
                link: req.link,
                description: req.description,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        info!(recipe_id = recipe.id, %user_id, "Recipe created");
        Ok(RecipeDetail::from(recipe))
    }

    /// Replace every writable field of a recipe
    pub async fn replace(
        pool: &PgPool,
        user_id: Uuid,
        id: i64,
        req: RecipeRequest,
    ) -> Result<RecipeDetail, ApiError> {
        validate_recipe(&req)?;

        let changes = RecipeChanges {
            title: Some(req.title),
            time_minutes: Some(req.time_minutes),
            price: Some(req.price.round_dp(2)),
            link: Some(req.link),
            description: Some(req.description),
        };

        Self::apply(pool, user_id, id, changes).await
    }

    /// Update only the given fields of a recipe
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: i64,
        req: RecipePatchRequest,
    ) -> Result<RecipeDetail, ApiError> {
        validate_recipe_patch(&req)?;

        let changes = RecipeChanges {
            title: req.title,
            time_minutes: req.time_minutes,
            price: req.price.map(|p| p.round_dp(2)),
            link: req.link,
            description: req.description,
        };

        Self::apply(pool, user_id, id, changes).await
    }

    async fn apply(
        pool: &PgPool,
        user_id: Uuid,
        id: i64,
        changes: RecipeChanges,
    ) -> Result<RecipeDetail, ApiError> {
        RecipeRepository::update(pool, id, user_id, changes)
            .await
            .map_err(ApiError::Internal)?
            .map(RecipeDetail::from)
            .ok_or_else(not_found)
    }

    /// Delete one of the user's recipes
    pub async fn delete(pool: &PgPool, user_id: Uuid, id: i64) -> Result<(), ApiError> {
        let deleted = RecipeRepository::delete(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(not_found());
        }

        info!(recipe_id = id, %user_id, "Recipe deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn sample_request() -> RecipeRequest {
        RecipeRequest {
            title: "Sample Recipe Title".to_string(),
            time_minutes: 22,
            price: Decimal::from_str("5.25").unwrap(),
            link: "https://example.com/recipe.pdf".to_string(),
            description: "Sample Recipe Description".to_string(),
        }
    }

    fn sample_record() -> RecipeRecord {
        let now = Utc::now();
        let req = sample_request();
        RecipeRecord {
            id: 7,
            user_id: Uuid::new_v4(),
            title: req.title,
            time_minutes: req.time_minutes,
            price: req.price,
            link: req.link,
            description: req.description,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_summary_omits_description() {
        let json = serde_json::to_value(RecipeSummary::from(sample_record())).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["price"], "5.25");
        assert!(json.get("description").is_none());
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_detail_includes_description() {
        let detail = RecipeDetail::from(sample_record());
        assert_eq!(detail.description, "Sample Recipe Description");
        assert_eq!(detail.link, "https://example.com/recipe.pdf");
    }

    #[test]
    fn test_validate_recipe() {
        assert!(validate_recipe(&sample_request()).is_ok());

        let mut req = sample_request();
        req.title = String::new();
        assert_eq!(validate_recipe(&req).unwrap_err().field, "title");

        let mut req = sample_request();
        req.price = Decimal::from_str("1234.50").unwrap();
        assert_eq!(validate_recipe(&req).unwrap_err().field, "price");
    }

    #[test]
    fn test_validate_recipe_patch_checks_present_fields_only() {
        assert!(validate_recipe_patch(&RecipePatchRequest::default()).is_ok());

        let patch = RecipePatchRequest {
            time_minutes: Some(-5),
            ..Default::default()
        };
        assert_eq!(validate_recipe_patch(&patch).unwrap_err().field, "time_minutes");
    }
}
