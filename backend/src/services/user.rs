//! User service: account creation, token issuance and self-management
//!
//! Emails are normalized before every write and lookup. Password hashing
//! and verification run on the blocking pool.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{NewUser, UserChanges, UserRecord, UserRepository};
use recipe_api_shared::types::{
    CreateUserRequest, TokenRequest, TokenResponse, UpdateUserRequest, UserResponse,
};
use recipe_api_shared::validation::{
    normalize_email, validate_email, validate_name, validate_password,
};
use recipe_api_shared::ValidationError;
use sqlx::PgPool;
use tracing::info;

const DUPLICATE_EMAIL: &str = "A user with this email already exists";
const BAD_CREDENTIALS: &str = "Unable to authenticate with provided credentials";

/// Flags applied on user creation
#[derive(Debug, Clone, Copy)]
pub struct UserFlags {
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl UserFlags {
    pub const REGULAR: UserFlags = UserFlags {
        is_active: true,
        is_staff: false,
        is_superuser: false,
    };

    pub const SUPERUSER: UserFlags = UserFlags {
        is_active: true,
        is_staff: true,
        is_superuser: true,
    };
}

impl From<&UserRecord> for UserResponse {
    fn from(user: &UserRecord) -> Self {
        UserResponse {
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// User service
pub struct UserService;

impl UserService {
    /// Create a regular user
    pub async fn create_user(
        pool: &PgPool,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<UserRecord, ApiError> {
        Self::create_with_flags(pool, email, password, name, UserFlags::REGULAR).await
    }

    /// Create a user with staff and superuser rights
    pub async fn create_superuser(
        pool: &PgPool,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, ApiError> {
        Self::create_with_flags(pool, email, password, "", UserFlags::SUPERUSER).await
    }

    /// Validate, normalize, hash and insert
    pub async fn create_with_flags(
        pool: &PgPool,
        email: &str,
        password: &str,
        name: &str,
        flags: UserFlags,
    ) -> Result<UserRecord, ApiError> {
        let email = normalize_email(email);
        validate_email(&email)?;
        validate_password(password)?;
        validate_name(name)?;

        if UserRepository::email_exists(pool, &email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let password_hash = PasswordService::hash_async(password.to_string())
            .await
            .map_err(ApiError::Internal)?;

        let user = UserRepository::create(
            pool,
            NewUser {
                email,
                name: name.to_string(),
                password_hash,
                is_active: flags.is_active,
                is_staff: flags.is_staff,
                is_superuser: flags.is_superuser,
            },
        )
        .await
        .map_err(|e| ApiError::from_write(e, DUPLICATE_EMAIL))?;

        info!(user_id = %user.id, is_staff = user.is_staff, "User created");
        Ok(user)
    }

    /// Handle a signup request
    pub async fn register(pool: &PgPool, req: CreateUserRequest) -> Result<UserResponse, ApiError> {
        let user = Self::create_user(pool, &req.email, &req.password, &req.name).await?;
        Ok(UserResponse::from(&user))
    }

    /// Check credentials. Unknown emails, wrong passwords and inactive
    /// accounts all yield `None`.
    pub async fn authenticate(
        pool: &PgPool,
        email: &str,
        password: &str,
    ) -> Result<Option<UserRecord>, ApiError> {
        let email = normalize_email(email);
        let Some(user) = UserRepository::find_by_email(pool, &email)
            .await
            .map_err(ApiError::Internal)?
        else {
            return Ok(None);
        };

        let valid = PasswordService::verify_async(password.to_string(), user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        Ok((valid && user.is_active).then_some(user))
    }

    /// Exchange credentials for a token
    pub async fn issue_token(
        pool: &PgPool,
        jwt_service: &JwtService,
        req: TokenRequest,
    ) -> Result<TokenResponse, ApiError> {
        if req.email.trim().is_empty() {
            return Err(ValidationError::new("email", "This field may not be blank").into());
        }
        // Passwords are not trimmed
        if req.password.is_empty() {
            return Err(ValidationError::new("password", "This field may not be blank").into());
        }

        let user = Self::authenticate(pool, &req.email, &req.password)
            .await?
            .ok_or_else(|| ApiError::Validation(BAD_CREDENTIALS.to_string()))?;

        let token = jwt_service
            .issue_token(user.id)
            .map_err(ApiError::Internal)?;

        UserRepository::touch_last_login(pool, user.id)
            .await
            .map_err(ApiError::Internal)?;

        metrics::counter!("auth_tokens_issued_total").increment(1);
        info!(user_id = %user.id, "Token issued");

        Ok(TokenResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_service.expiry_secs(),
        })
    }

    /// Replace email, password and name of the authenticated user
    pub async fn replace_me(
        pool: &PgPool,
        user: &UserRecord,
        req: CreateUserRequest,
    ) -> Result<UserResponse, ApiError> {
        Self::update_me(
            pool,
            user,
            UpdateUserRequest {
                email: Some(req.email),
                password: Some(req.password),
                name: Some(req.name),
            },
        )
        .await
    }

    /// Partially update the authenticated user. A given password must pass
    /// the same checks as on signup and is re-hashed.
    pub async fn update_me(
        pool: &PgPool,
        user: &UserRecord,
        req: UpdateUserRequest,
    ) -> Result<UserResponse, ApiError> {
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

        let password_hash = match req.password {
            Some(password) => {
                validate_password(&password)?;
                Some(
                    PasswordService::hash_async(password)
                        .await
                        .map_err(ApiError::Internal)?,
                )
            }
            None => None,
        };

        let changes = UserChanges {
            email,
            name: req.name,
            password_hash,
            ..Default::default()
        };

        let updated = UserRepository::update(pool, user.id, changes)
            .await
            .map_err(|e| ApiError::from_write(e, DUPLICATE_EMAIL))?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(UserResponse::from(&updated))
    }
}
