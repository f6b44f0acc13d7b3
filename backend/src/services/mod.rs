//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the HTTP layer.

pub mod admin;
pub mod recipe;
pub mod user;

pub use admin::{AdminService, UserAdmin};
pub use recipe::RecipeService;
pub use user::{UserFlags, UserService};
