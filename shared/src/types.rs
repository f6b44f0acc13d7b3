//! API request and response types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// ============================================================================
// User Types
// ============================================================================

/// User creation request
///
/// Also used for full (`PUT`) updates of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
}

/// Partial (`PATCH`) update of the authenticated user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Public view of a user. The password is write-only and never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

/// Token request
///
/// Fields default to empty so that missing values surface as validation
/// errors rather than deserialization rejections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Issued authentication token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// ============================================================================
// Recipe Types
// ============================================================================

/// Recipe as shown in listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
}

/// Recipe detail (summary fields plus description)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub description: String,
}

/// Recipe create / full update request. `id` is read-only and ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRequest {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
}

/// Recipe partial update request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipePatchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_minutes: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ============================================================================
// Admin Types
// ============================================================================

/// Row of the admin user list; columns follow the admin's list display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserListItem {
    pub id: Uuid,
    #[serde(flatten)]
    pub columns: serde_json::Map<String, serde_json::Value>,
}

/// Named group of fields on the admin change view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminFieldSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Admin change view of a single user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserDetail {
    pub id: Uuid,
    pub fieldsets: Vec<AdminFieldSet>,
    pub readonly_fields: Vec<String>,
}

/// Admin add-user request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAddUserRequest {
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

/// Admin change request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminUpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_staff: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
}

fn default_true() -> bool {
    true
}
