//! Staff-facing user administration
//!
//! `UserAdmin` describes how users are presented to staff: which columns
//! the list shows, how the change view groups fields and which fields the
//! add view accepts. It is built once at startup and carried in `AppState`.

use crate::error::ApiError;
use crate::repositories::{UserChanges, UserRecord, UserRepository};
use crate::services::user::{UserFlags, UserService};
use recipe_api_shared::types::{
    AdminAddUserRequest, AdminFieldSet, AdminUpdateUserRequest, AdminUserDetail,
    AdminUserListItem,
};
use recipe_api_shared::validation::{normalize_email, validate_email, validate_name};
use recipe_api_shared::ValidationError;
use serde_json::{Map, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

/// A titled group of fields on the change view
#[derive(Debug, Clone, Copy)]
pub struct FieldGroup {
    pub title: Option<&'static str>,
    pub fields: &'static [&'static str],
}

/// Presentation of users on the admin surface
#[derive(Debug, Clone, Copy)]
pub struct UserAdmin {
    pub list_display: &'static [&'static str],
    pub fieldsets: &'static [FieldGroup],
    pub readonly_fields: &'static [&'static str],
    pub add_fields: &'static [&'static str],
}

impl Default for UserAdmin {
    fn default() -> Self {
        Self {
            list_display: &["email", "name"],
            fieldsets: &[
                FieldGroup {
                    title: None,
                    fields: &["email", "password"],
                },
                FieldGroup {
                    title: Some("Permissions"),
                    fields: &["is_active", "is_staff", "is_superuser"],
                },
                FieldGroup {
                    title: Some("Important Dates"),
                    fields: &["last_login"],
                },
            ],
            readonly_fields: &["last_login"],
            add_fields: &[
                "name",
                "email",
                "password1",
                "password2",
                "is_active",
                "is_staff",
                "is_superuser",
            ],
        }
    }
}

impl UserAdmin {
    /// Render a single field of a user. Passwords only reveal the algorithm.
    pub fn field_value(user: &UserRecord, field: &str) -> Value {
        match field {
            "id" => Value::from(user.id.to_string()),
            "email" => Value::from(user.email.clone()),
            "name" => Value::from(user.name.clone()),
            "password" => {
                let algorithm = user.password_hash.split('$').nth(1).unwrap_or("unknown");
                Value::from(format!("{}: hashed", algorithm))
            }
            "is_active" => Value::from(user.is_active),
            "is_staff" => Value::from(user.is_staff),
            "is_superuser" => Value::from(user.is_superuser),
            "last_login" => user
                .last_login
                .map(|t| Value::from(t.to_rfc3339()))
                .unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }

    fn columns(user: &UserRecord, fields: &[&str]) -> Map<String, Value> {
        fields
            .iter()
            .map(|field| (field.to_string(), Self::field_value(user, field)))
            .collect()
    }

    /// Row for the user list
    pub fn list_item(&self, user: &UserRecord) -> AdminUserListItem {
        AdminUserListItem {
            id: user.id,
            columns: Self::columns(user, self.list_display),
        }
    }

    /// Change view for one user
    pub fn change_view(&self, user: &UserRecord) -> AdminUserDetail {
        AdminUserDetail {
            id: user.id,
            fieldsets: self
                .fieldsets
                .iter()
                .map(|set| AdminFieldSet {
                    title: set.title.map(str::to_string),
                    fields: Self::columns(user, set.fields),
                })
                .collect(),
            readonly_fields: self.readonly_fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Admin operations on users
pub struct AdminService;

impl AdminService {
    /// All users, in creation order
    pub async fn list(pool: &PgPool, admin: &UserAdmin) -> Result<Vec<AdminUserListItem>, ApiError> {
        let users = UserRepository::list(pool).await.map_err(ApiError::Internal)?;
        Ok(users.iter().map(|u| admin.list_item(u)).collect())
    }

    /// Change view of one user
    pub async fn detail(
        pool: &PgPool,
        admin: &UserAdmin,
        id: Uuid,
    ) -> Result<AdminUserDetail, ApiError> {
        let user = UserRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        Ok(admin.change_view(&user))
    }

    /// Fields accepted by the add view
    pub fn add_form(admin: &UserAdmin) -> Vec<String> {
        admin.add_fields.iter().map(|f| f.to_string()).collect()
    }

    /// Add a user from the add view
    pub async fn add(
        pool: &PgPool,
        admin: &UserAdmin,
        req: AdminAddUserRequest,
    ) -> Result<AdminUserDetail, ApiError> {
        if req.password1 != req.password2 {
            return Err(ValidationError::new(
                "password2",
                "The two password fields didn't match",
            )
            .into());
        }

        let flags = UserFlags {
            is_active: req.is_active,
            is_staff: req.is_staff,
            is_superuser: req.is_superuser,
        };
        let user =
            UserService::create_with_flags(pool, &req.email, &req.password1, &req.name, flags)
                .await?;

        Ok(admin.change_view(&user))
    }

    /// Edit identity and permission flags
    pub async fn update(
        pool: &PgPool,
        admin: &UserAdmin,
        id: Uuid,
        req: AdminUpdateUserRequest,
    ) -> Result<AdminUserDetail, ApiError> {
        let email = match req.email {
            Some(email) => {
                let email = normalize_email(&email);
                validate_email(&email)?;
                Some(email)
            }
            None => None,
        };
        if let Some(name) = &req.name {
            validate_name(name)?;
        }

        let changes = UserChanges {
            email,
            name: req.name,
            password_hash: None,
            is_active: req.is_active,
            is_staff: req.is_staff,
            is_superuser: req.is_superuser,
        };

        let user = UserRepository::update(pool, id, changes)
            .await
            .map_err(|e| ApiError::from_write(e, "A user with this email already exists"))?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        info!(user_id = %user.id, "User updated by staff");
        Ok(admin.change_view(&user))
    }
}
