//! Logging and metrics setup shared by the server and `wait-for-db`

use crate::config::AppConfig;
use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const PRODUCTION_FILTER: &str = "recipe_api_backend=info,tower_http=info";
const DEVELOPMENT_FILTER: &str = "recipe_api_backend=debug,tower_http=debug,sqlx=warn";

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(production: bool) -> &'static str {
    if production {
        PRODUCTION_FILTER
    } else {
        DEVELOPMENT_FILTER
    }
}

/// Initialize tracing: JSON lines in production, pretty output otherwise.
/// Logs go to stderr so stdout stays free for command output.
pub fn init_tracing() {
    let production = AppConfig::is_production();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(production).into());

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if production {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

/// Install the global Prometheus recorder
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_by_environment() {
        assert!(default_filter(true).contains("recipe_api_backend=info"));
        assert!(default_filter(false).contains("recipe_api_backend=debug"));
        assert!(default_filter(false).contains("sqlx=warn"));
    }
}
