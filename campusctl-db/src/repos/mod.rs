//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Holds the executor as an explicit dependency (no globals)
//! - One stored-procedure call per operation, arguments bound
//! - Business outcomes come back as rows; only input validation fails early

pub mod classrooms;
pub mod positions;

pub use classrooms::{validate_building_number, ClassroomLocation, ClassroomRepo};
pub use positions::{PositionRepo, TeacherPosition};
