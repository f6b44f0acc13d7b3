//! Database readiness gate
//!
//! Blocks startup until the database accepts connections. Each attempt is
//! classified: "not ready yet" failures are retried after a fixed interval
//! for as long as it takes, everything else is returned to the caller
//! immediately.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection};
use std::io::Write;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info, warn};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Outcome of a failed connection check
#[derive(Error, Debug)]
pub enum CheckError {
    /// The database is not accepting connections yet
    #[error(transparent)]
    TransientUnavailable(BoxError),

    /// Anything that waiting will not fix
    #[error(transparent)]
    Other(BoxError),
}

impl CheckError {
    pub fn transient(err: impl Into<BoxError>) -> Self {
        Self::TransientUnavailable(err.into())
    }

    pub fn other(err: impl Into<BoxError>) -> Self {
        Self::Other(err.into())
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientUnavailable(_))
    }
}

/// A single connectivity probe against the database
#[async_trait]
pub trait ConnectionCheck: Send + Sync {
    async fn check(&self) -> Result<(), CheckError>;
}

/// Summary of a completed wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitReport {
    pub retries: u64,
    pub elapsed: Duration,
}

/// Poll `check` until it succeeds.
///
/// Progress lines go to `out`; write failures on `out` are ignored.
pub async fn wait_for_db<C, W>(
    check: &C,
    retry_interval: Duration,
    out: &mut W,
) -> Result<WaitReport, CheckError>
where
    C: ConnectionCheck + ?Sized,
    W: Write,
{
    let started = Instant::now();
    let mut retries = 0u64;

    writeln!(out, "Waiting for database...").ok();
    info!("Waiting for database");

    loop {
        match check.check().await {
            Ok(()) => break,
            Err(CheckError::TransientUnavailable(err)) => {
                writeln!(
                    out,
                    "Database unavailable, waiting {}...",
                    describe_interval(retry_interval)
                )
                .ok();
                warn!(error = %err, retries, "Database unavailable, retrying");
                metrics::counter!("db_readiness_retries_total").increment(1);

                retries += 1;
                tokio::time::sleep(retry_interval).await;
            }
            Err(err) => {
                error!(error = %err, "Database check failed");
                return Err(err);
            }
        }
    }

    writeln!(out, "Database available!").ok();
    info!(retries, "Database available");

    Ok(WaitReport {
        retries,
        elapsed: started.elapsed(),
    })
}

fn describe_interval(interval: Duration) -> String {
    match interval.as_millis() {
        1000 => "1 second".to_string(),
        ms if ms > 0 && ms % 1000 == 0 => format!("{} seconds", ms / 1000),
        ms => format!("{} ms", ms),
    }
}

/// PostgreSQL connectivity probe: opens a fresh connection and runs `SELECT 1`.
///
/// A fresh connection per attempt keeps a half-started server from being
/// masked by a pooled connection.
pub struct PgConnectionCheck {
    url: String,
    connect_timeout: Duration,
}

impl PgConnectionCheck {
    pub fn new(url: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            url: url.into(),
            connect_timeout,
        }
    }

    async fn probe(&self, options: &PgConnectOptions) -> Result<(), sqlx::Error> {
        let mut conn = PgConnection::connect_with(options).await?;
        sqlx::query("SELECT 1").execute(&mut conn).await?;
        conn.close().await?;
        Ok(())
    }
}

#[async_trait]
impl ConnectionCheck for PgConnectionCheck {
    async fn check(&self) -> Result<(), CheckError> {
        let options = PgConnectOptions::from_str(&self.url)
            .map_err(classify)?
            .application_name("recipe-api-wait-for-db")
            .disable_statement_logging();

        match tokio::time::timeout(self.connect_timeout, self.probe(&options)).await {
            Ok(result) => result.map_err(classify),
            Err(elapsed) => Err(CheckError::transient(elapsed)),
        }
    }
}

/// Sort a driver error into "retry" or "give up"
pub fn classify(err: sqlx::Error) -> CheckError {
    if is_transient(&err) {
        CheckError::transient(err)
    } else {
        CheckError::other(err)
    }
}

/// Whether a driver error means the database is not ready yet
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut => true,
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map(|code| is_transient_sqlstate(&code))
            .unwrap_or(false),
        _ => false,
    }
}

/// SQLSTATE codes a starting or overloaded server reports.
/// 57P03: cannot_connect_now, 53300: too_many_connections, class 08: connection exception.
pub fn is_transient_sqlstate(code: &str) -> bool {
    matches!(code, "57P03" | "53300") || code.starts_with("08")
}
