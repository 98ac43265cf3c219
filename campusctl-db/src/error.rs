//! Error types for campusctl-db

use campusctl_core::{ErrorCode, RuleError, RuleFailure};
use thiserror::Error;

/// Failure talking to the database or decoding what it returned
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("unsupported column type {type_name} for column '{column}'")]
    UnsupportedColumn { column: String, type_name: String },

    #[error("missing column '{column}' in result of {procedure}")]
    MissingColumn {
        procedure: &'static str,
        column: &'static str,
    },
}

/// Error from a repository operation that validates its input
#[derive(Debug, Error)]
pub enum RepoError {
    /// Input rejected before any query was issued.
    ///
    /// `code` is the catalog string a client maps through its error table;
    /// `failures` keeps the per-field detail.
    #[error("validation failed (code {code})")]
    Validation {
        kind: ErrorCode,
        code: String,
        failures: Vec<RuleFailure>,
    },

    #[error("invalid validation rules: {0}")]
    Rules(#[from] RuleError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl RepoError {
    /// Catalog code for validation failures.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Validation { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Machine-readable kind for validation failures.
    pub fn kind(&self) -> Option<ErrorCode> {
        match self {
            Self::Validation { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        Self::Db(DbError::Sqlx(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_exposes_code_and_kind() {
        let err = RepoError::Validation {
            kind: ErrorCode::InvalidToken,
            code: "13".into(),
            failures: vec![],
        };
        assert_eq!(err.code(), Some("13"));
        assert_eq!(err.kind(), Some(ErrorCode::InvalidToken));
        assert_eq!(err.to_string(), "validation failed (code 13)");
    }

    #[test]
    fn db_errors_have_no_code() {
        let err: RepoError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.code(), None);
        assert!(matches!(err, RepoError::Db(DbError::Sqlx(_))));
    }
}
