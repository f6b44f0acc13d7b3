//! Recipe repository for database operations
//!
//! Every query is scoped by owner: a recipe belonging to another user is
//! indistinguishable from a missing one.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;

const RECIPE_COLUMNS: &str =
    "id, user_id, title, time_minutes, price, link, description, created_at, updated_at";

/// Recipe record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for RecipeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Input for creating a recipe
#[derive(Debug, Clone)]
pub struct CreateRecipe {
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub description: String,
}

/// Column changes for an existing recipe; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub description: Option<String>,
}

/// Recipe repository
pub struct RecipeRepository;

impl RecipeRepository {
    /// Create a new recipe
    pub async fn create(pool: &PgPool, input: CreateRecipe) -> Result<RecipeRecord> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(&format!(
            r#"
            INSERT INTO recipes (user_id, title, time_minutes, price, link, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(input.user_id)
        .bind(&input.title)
        .bind(input.time_minutes)
        .bind(input.price)
        .bind(&input.link)
        .bind(&input.description)
        .fetch_one(pool)
        .await?;

        Ok(recipe)
    }

    /// All recipes of a user, newest id first
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<RecipeRecord>> {
        let recipes = sqlx::query_as::<_, RecipeRecord>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE user_id = $1 ORDER BY id DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(recipes)
    }

    /// Find a recipe by ID, restricted to its owner
    pub async fn find_for_user(
        pool: &PgPool,
        id: i64,
        user_id: Uuid,
    ) -> Result<Option<RecipeRecord>> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(recipe)
    }

    /// Apply changes to a recipe owned by `user_id`
    pub async fn update(
        pool: &PgPool,
        id: i64,
        user_id: Uuid,
        changes: RecipeChanges,
    ) -> Result<Option<RecipeRecord>> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(&format!(
            r#"
            UPDATE recipes SET
                title = COALESCE($3, title),
                time_minutes = COALESCE($4, time_minutes),
                price = COALESCE($5, price),
                link = COALESCE($6, link),
                description = COALESCE($7, description),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(changes.title)
        .bind(changes.time_minutes)
        .bind(changes.price)
        .bind(changes.link)
        .bind(changes.description)
        .fetch_optional(pool)
        .await?;

        Ok(recipe)
    }

    /// Delete a recipe owned by `user_id`
    pub async fn delete(pool: &PgPool, id: i64, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_recipe_displays_as_title() {
        let now = Utc::now();
        let recipe = RecipeRecord {
            id: 1,
            user_id: Uuid::new_v4(),
            title: "Sample Recipe Name".to_string(),
            time_minutes: 5,
            price: Decimal::from_str("5.50").unwrap(),
            link: String::new(),
            description: "Same Test Description".to_string(),
            created_at: now,
            updated_at: now,
        };

        assert_eq!(recipe.to_string(), recipe.title);
    }
}
