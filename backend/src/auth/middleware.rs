//! Request authentication extractors
//!
//! `AuthUser` resolves the `Authorization` header to an active user.
//! Both `Bearer <token>` and `Token <token>` schemes are accepted.
//! `StaffUser` additionally requires the staff flag.

use crate::error::ApiError;
use crate::repositories::{UserRecord, UserRepository};
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use uuid::Uuid;

const AUTH_SCHEMES: [&str; 2] = ["Bearer ", "Token "];

/// Authenticated user resolved from the request token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: UserRecord,
}

impl AuthUser {
    #[inline]
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

/// Pull the raw token out of the Authorization header
pub fn extract_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    AUTH_SCHEMES
        .iter()
        .find_map(|scheme| auth_header.strip_prefix(scheme))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = extract_token(&parts.headers)?;

        let claims = app_state
            .jwt()
            .validate_token(token)
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        let user_id = claims
            .user_id()
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        let user = UserRepository::find_by_id(app_state.db(), user_id)
            .await
            .map_err(ApiError::Internal)?
            .filter(|user| user.is_active)
            .ok_or_else(|| ApiError::Unauthorized("User inactive or deleted".to_string()))?;

        Ok(AuthUser { user })
    }
}

/// Authenticated staff user (admin surface)
#[derive(Debug, Clone)]
pub struct StaffUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for StaffUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if !auth.user.is_staff {
            return Err(ApiError::Forbidden(
                "You do not have permission to perform this action".to_string(),
            ));
        }
        Ok(StaffUser(auth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_scheme() {
        let headers = headers("Bearer abc.def.ghi");
        assert_eq!(extract_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_token_scheme() {
        let headers = headers("Token abc.def.ghi");
        assert_eq!(extract_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            extract_token(&HeaderMap::new()),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_unknown_scheme_and_empty_token() {
        assert!(extract_token(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(extract_token(&headers("Bearer ")).is_err());
        assert!(extract_token(&headers("abc.def.ghi")).is_err());
    }
}
