//! Command implementations for the campusctl CLI
//!
//! Results print as JSON on stdout. Failures a client is expected to
//! interpret (validation, connection) print as a coded JSON object and exit
//! with status 2; everything else surfaces through `anyhow`.

pub mod classrooms;
pub mod positions;
pub mod validate;

pub use classrooms::{run_buildings, run_classrooms};
pub use positions::run_positions;
pub use validate::run_validate;

use std::fmt;

use anyhow::{Context as _, Result};
use campusctl_core::{CampusConfig, ErrorCatalog, ErrorCode, RuleFailure};
use campusctl_db::{create_lazy_pool, DbError, PgExecutor, RepoError};
use serde::Serialize;

/// Exit status for coded failures
pub const CODED_FAILURE_EXIT: i32 = 2;

/// SQLSTATE for a rejected password
const INVALID_PASSWORD: &str = "28P01";

/// Resolved settings shared by every command
pub struct Context {
    pub config: CampusConfig,
    pub database_url: Option<String>,
}

impl Context {
    pub fn errors(&self) -> &ErrorCatalog {
        &self.config.errors
    }

    /// Executor over a lazily connected pool.
    ///
    /// No connection is attempted until the first procedure call.
    pub fn executor(&self) -> Result<PgExecutor> {
        let url = self
            .database_url
            .clone()
            .or_else(|| self.config.database_url())
            .ok_or_else(|| {
                CodedFailure::new(
                    "connection_error",
                    ErrorCode::NotConnectWithData,
                    self.errors(),
                    "no database URL; set --database-url, DATABASE_URL or [database].url",
                )
            })?;

        let pool = create_lazy_pool(&url, &self.config.database)
            .context("Invalid database URL")?;
        Ok(PgExecutor::new(pool))
    }
}

/// Failure reported to the caller as a catalog code
#[derive(Debug, Serialize)]
pub struct CodedFailure {
    pub error: &'static str,
    pub kind: ErrorCode,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RuleFailure>,
}

impl CodedFailure {
    pub fn new(
        error: &'static str,
        kind: ErrorCode,
        errors: &ErrorCatalog,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error,
            kind,
            code: errors.code(kind),
            message: message.into(),
            failures: Vec::new(),
        }
    }
}

impl fmt::Display for CodedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {}): {}", self.error, self.code, self.message)
    }
}

impl std::error::Error for CodedFailure {}

/// Map a database failure to a coded failure where the client can act on
/// it, or to a plain error otherwise.
pub fn db_failure(err: DbError, errors: &ErrorCatalog) -> anyhow::Error {
    let kind = match &err {
        DbError::Sqlx(sqlx::Error::Database(db))
            if db.code().as_deref() == Some(INVALID_PASSWORD) =>
        {
            Some(ErrorCode::InvalidLoginOrPassword)
        }
        DbError::Sqlx(
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut,
        ) => Some(ErrorCode::ErrorConnectToDb),
        _ => None,
    };

    match kind {
        Some(kind) => {
            CodedFailure::new("connection_error", kind, errors, err.to_string()).into()
        }
        None => anyhow::Error::new(err).context("Stored procedure call failed"),
    }
}

/// Map a repository failure, keeping validation detail.
pub fn repo_failure(err: RepoError, errors: &ErrorCatalog) -> anyhow::Error {
    match err {
        RepoError::Validation {
            kind,
            code,
            failures,
        } => {
            let message = failures
                .first()
                .map(|f| f.message.clone())
                .unwrap_or_else(|| "invalid input".to_string());
            CodedFailure {
                error: "validation_error",
                kind,
                code,
                message,
                failures,
            }
            .into()
        }
        RepoError::Db(e) => db_failure(e, errors),
        other => anyhow::Error::new(other),
    }
}

/// Print a result as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", rendered);
    Ok(())
}
