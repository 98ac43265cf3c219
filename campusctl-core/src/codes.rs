//! Application error-code catalog
//!
//! Clients interpret failures through a fixed table of short numeric codes.
//! A code is the group prefix followed by the entry, so with the default
//! catalog an invalid token is reported as `"13"`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable error kinds backed by catalog entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotConnectWithData,
    InvalidLoginOrPassword,
    ErrorConnectToDb,
    EmptyLoginOrPassword,
    UpdateToken,
    RemoveToken,
    InvalidToken,
}

impl ErrorCode {
    /// Dotted config key of the catalog entry, without the group prefix.
    pub fn key(self) -> &'static str {
        match self {
            Self::NotConnectWithData => "errors.connection.not_connect_with_data",
            Self::InvalidLoginOrPassword => "errors.connection.invalid_login_or_password",
            Self::ErrorConnectToDb => "errors.connection.error_connect_to_db",
            Self::EmptyLoginOrPassword => "errors.connection.empty_login_or_password",
            Self::UpdateToken => "errors.token.update_token",
            Self::RemoveToken => "errors.token.remove_token",
            Self::InvalidToken => "errors.token.invalid_token",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key().trim_start_matches("errors."))
    }
}

/// `[errors]` section of the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorCatalog {
    pub connection_prefix: String,
    pub token_prefix: String,
    pub connection: ConnectionCodes,
    pub token: TokenCodes,
}

/// `[errors.connection]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionCodes {
    pub not_connect_with_data: String,
    pub invalid_login_or_password: String,
    pub error_connect_to_db: String,
    pub empty_login_or_password: String,
}

/// `[errors.token]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenCodes {
    pub update_token: String,
    pub remove_token: String,
    pub invalid_token: String,
}

impl Default for ErrorCatalog {
    fn default() -> Self {
        Self {
            connection_prefix: "1".to_string(),
            token_prefix: "1".to_string(),
            connection: ConnectionCodes::default(),
            token: TokenCodes::default(),
        }
    }
}

impl Default for ConnectionCodes {
    fn default() -> Self {
        Self {
            not_connect_with_data: "1".to_string(),
            invalid_login_or_password: "2".to_string(),
            error_connect_to_db: "3".to_string(),
            empty_login_or_password: "4".to_string(),
        }
    }
}

impl Default for TokenCodes {
    fn default() -> Self {
        Self {
            update_token: "1".to_string(),
            remove_token: "2".to_string(),
            invalid_token: "3".to_string(),
        }
    }
}

impl ErrorCatalog {
    /// Full code string for `code`: group prefix + entry.
    pub fn code(&self, code: ErrorCode) -> String {
        let (prefix, entry) = match code {
            ErrorCode::NotConnectWithData => {
                (&self.connection_prefix, &self.connection.not_connect_with_data)
            }
            ErrorCode::InvalidLoginOrPassword => (
                &self.connection_prefix,
                &self.connection.invalid_login_or_password,
            ),
            ErrorCode::ErrorConnectToDb => {
                (&self.connection_prefix, &self.connection.error_connect_to_db)
            }
            ErrorCode::EmptyLoginOrPassword => (
                &self.connection_prefix,
                &self.connection.empty_login_or_password,
            ),
            ErrorCode::UpdateToken => (&self.token_prefix, &self.token.update_token),
            ErrorCode::RemoveToken => (&self.token_prefix, &self.token.remove_token),
            ErrorCode::InvalidToken => (&self.token_prefix, &self.token.invalid_token),
        };
        format!("{prefix}{entry}")
    }

    /// Look up a raw catalog value by dotted key (`errors.token_prefix`,
    /// `errors.token.invalid_token`, ...).
    pub fn get(&self, key: &str) -> Option<&str> {
        let rest = key.strip_prefix("errors.")?;
        let value = match rest {
            "connection_prefix" => &self.connection_prefix,
            "token_prefix" => &self.token_prefix,
            "connection.not_connect_with_data" => &self.connection.not_connect_with_data,
            "connection.invalid_login_or_password" => {
                &self.connection.invalid_login_or_password
            }
            "connection.error_connect_to_db" => &self.connection.error_connect_to_db,
            "connection.empty_login_or_password" => &self.connection.empty_login_or_password,
            "token.update_token" => &self.token.update_token,
            "token.remove_token" => &self.token.remove_token,
            "token.invalid_token" => &self.token.invalid_token,
            _ => return None,
        };
        Some(value.as_str())
    }
}
