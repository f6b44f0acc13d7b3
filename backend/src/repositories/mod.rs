//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod recipe;
pub mod user;

pub use recipe::{CreateRecipe, RecipeChanges, RecipeRecord, RecipeRepository};
pub use user::{NewUser, UserChanges, UserRecord, UserRepository};
