//! Teacher position repository

use serde::Serialize;
use serde_json::Value;

use crate::error::DbError;
use crate::executor::{ProcedureCall, ProcedureExecutor};
use crate::rows::Rows;

/// One entry of the teacher position listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPosition {
    pub teacher_position: Value,
}

/// Teacher position repository
pub struct PositionRepo<'a, E: ProcedureExecutor + ?Sized> {
    executor: &'a E,
}

impl<'a, E: ProcedureExecutor + ?Sized> PositionRepo<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// Add a position; the status row says whether it already existed.
    pub async fn add_position(&self, name: &str) -> Result<Rows, DbError> {
        self.executor
            .call(ProcedureCall::new("add_position").text(name))
            .await
    }

    /// Delete a position by name; the status row reports whether it existed.
    pub async fn delete_teacher_position(&self, name: &str) -> Result<Rows, DbError> {
        self.executor
            .call(ProcedureCall::new("delete_teacher_position").text(name))
            .await
    }

    pub async fn get_position_by_id(&self, id: i32) -> Result<Rows, DbError> {
        self.executor
            .call(ProcedureCall::new("get_position_by_id").int(id))
            .await
    }

    /// All positions, one `teacherPosition` entry per row.
    pub async fn get_all_teacher_positions(&self) -> Result<Vec<TeacherPosition>, DbError> {
        const PROCEDURE: &str = "get_all_teacher_positions";

        let rows = self.executor.call(ProcedureCall::new(PROCEDURE)).await?;
        rows.into_iter()
            .map(|row| {
                row.get("teachers_positions")
                    .cloned()
                    .map(|teacher_position| TeacherPosition { teacher_position })
                    .ok_or(DbError::MissingColumn {
                        procedure: PROCEDURE,
                        column: "teachers_positions",
                    })
            })
            .collect()
    }
}
