//! Block until the configured database accepts connections.
//!
//! Takes no arguments; the database URL and retry interval come from the
//! usual configuration layers (`RECIPE__DATABASE__URL`,
//! `RECIPE__READINESS__RETRY_INTERVAL_MS`). Exits 0 once the database is
//! available. A failure that waiting cannot fix is printed as-is and exits 1.

use anyhow::Result;
use recipe_api_backend::config::AppConfig;
use recipe_api_backend::db::{wait_for_db, PgConnectionCheck};
use recipe_api_backend::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = AppConfig::load()?;
    let check = PgConnectionCheck::new(
        config.database.url.clone(),
        config.readiness.connect_timeout(),
    );

    let mut stdout = std::io::stdout();
    match wait_for_db(&check, config.readiness.retry_interval(), &mut stdout).await {
        Ok(report) => {
            tracing::debug!(
                retries = report.retries,
                elapsed = ?report.elapsed,
                "Readiness wait finished"
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}
