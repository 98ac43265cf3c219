//! campusctl-db: stored-procedure data access
//!
//! Classrooms, buildings and teacher positions live behind PostgreSQL
//! stored procedures. This crate marshals parameters into one procedure
//! call per operation and hands back the decoded result set.

pub mod error;
pub mod executor;
pub mod pool;
pub mod repos;
pub mod rows;

pub use error::{DbError, RepoError};
pub use executor::{MockExecutor, PgExecutor, ProcArg, ProcedureCall, ProcedureExecutor};
pub use pool::{create_lazy_pool, create_pool};
pub use repos::{
    validate_building_number, ClassroomLocation, ClassroomRepo, PositionRepo, TeacherPosition,
};
pub use rows::{Row, Rows};
