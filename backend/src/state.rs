//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::services::UserAdmin;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// Every field is cheap to clone: `PgPool` and the JWT keys are reference
/// counted, the config sits behind an `Arc`, `UserAdmin` is `Copy` and the
/// Prometheus handle wraps an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// JWT service with pre-computed keys
    pub jwt: JwtService,
    /// Admin presentation of users
    pub admin: UserAdmin,
    /// Prometheus recorder handle, when one is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state. Derives the JWT keys, so call once.
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry_secs);

        Self {
            db,
            config: Arc::new(config),
            jwt,
            admin: UserAdmin::default(),
            metrics: None,
        }
    }

    /// Attach the installed Prometheus recorder
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the database pool
    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    /// Get a reference to the JWT service
    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Get the admin presentation
    #[inline]
    pub fn admin(&self) -> &UserAdmin {
        &self.admin
    }
}
