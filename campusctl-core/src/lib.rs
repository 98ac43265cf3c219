//! campusctl-core: configuration, error codes and input validation
//!
//! Shared by the data-access crate and the `campusctl` binary. Nothing in
//! here touches the database.

pub mod codes;
pub mod config;
pub mod error;
pub mod validation;

pub use codes::{ErrorCatalog, ErrorCode};
pub use config::{CampusConfig, DatabaseConfig};
pub use error::{CoreError, Result};
pub use validation::{Inputs, RuleError, RuleFailure, Validation, Validator};
