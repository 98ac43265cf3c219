//! Classroom and building repository
//!
//! Thin wrappers over the housing procedures. Uniqueness and referential
//! integrity live in the database; add/delete procedures answer with a
//! status message row rather than an error.

use campusctl_core::validation::FailureKind;
use campusctl_core::{ErrorCatalog, ErrorCode, Inputs, RuleFailure, Validator};
use serde::Serialize;
use serde_json::Value;

use crate::error::{DbError, RepoError};
use crate::executor::{ProcedureCall, ProcedureExecutor};
use crate::rows::Rows;

const BUILDING_FIELD: &str = "num_building";

/// Building and classroom numbers of one classroom id
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomLocation {
    pub building_number: Value,
    pub class_number: Value,
}

/// Classroom repository
pub struct ClassroomRepo<'a, E: ProcedureExecutor + ?Sized> {
    executor: &'a E,
    errors: &'a ErrorCatalog,
}

impl<'a, E: ProcedureExecutor + ?Sized> ClassroomRepo<'a, E> {
    pub fn new(executor: &'a E, errors: &'a ErrorCatalog) -> Self {
        Self { executor, errors }
    }

    /// All buildings (`get_all_housing`).
    pub async fn get_all_buildings(&self) -> Result<Rows, DbError> {
        self.executor
            .call(ProcedureCall::new("get_all_housing"))
            .await
    }

    /// All classrooms (`get_all_classes`).
    pub async fn get_all_classrooms(&self) -> Result<Rows, DbError> {
        self.executor
            .call(ProcedureCall::new("get_all_classes"))
            .await
    }

    /// Classrooms of one building.
    ///
    /// `building_number` is the raw request value. It must be present,
    /// numeric and fit an integer building number; otherwise this fails
    /// with the `InvalidToken` catalog code before any query is issued.
    pub async fn get_all_classrooms_in_building(
        &self,
        building_number: Option<&str>,
    ) -> Result<Rows, RepoError> {
        let building = validate_building_number(building_number, self.errors)?;

        let rows = self
            .executor
            .call(ProcedureCall::new("get_all_classes_in_building").int(building))
            .await?;
        Ok(rows)
    }

    /// Add a classroom; the status row says whether it already existed.
    pub async fn add_classroom(
        &self,
        building_number: i32,
        class_number: i32,
    ) -> Result<Rows, DbError> {
        self.executor
            .call(
                ProcedureCall::new("add_classroom")
                    .int(building_number)
                    .int(class_number),
            )
            .await
    }

    /// Delete a building; the status row reports whether it existed.
    pub async fn delete_building(&self, building_number: i32) -> Result<Rows, DbError> {
        self.executor
            .call(ProcedureCall::new("delete_building").int(building_number))
            .await
    }

    /// Delete a classroom; the status row distinguishes a missing building
    /// from a missing classroom.
    pub async fn delete_classroom(
        &self,
        building_number: i32,
        class_number: i32,
    ) -> Result<Rows, DbError> {
        self.executor
            .call(
                ProcedureCall::new("delete_classroom")
                    .int(building_number)
                    .int(class_number),
            )
            .await
    }

    /// Building and classroom numbers for a classroom id, one entry per row.
    pub async fn get_building_and_class_by_id(
        &self,
        classroom_id: i32,
    ) -> Result<Vec<ClassroomLocation>, DbError> {
        const PROCEDURE: &str = "get_num_building_and_class_by_ID";

        let rows = self
            .executor
            .call(ProcedureCall::new(PROCEDURE).int(classroom_id))
            .await?;

        let mut locations = Vec::with_capacity(rows.len());
        for row in rows {
            let building_number = row.get("num_building").cloned().ok_or(DbError::MissingColumn {
                procedure: PROCEDURE,
                column: "num_building",
            })?;
            let class_number = row.get("num_class").cloned().ok_or(DbError::MissingColumn {
                procedure: PROCEDURE,
                column: "num_class",
            })?;
            locations.push(ClassroomLocation {
                building_number,
                class_number,
            });
        }
        Ok(locations)
    }

    /// Reverse lookup: classroom id for a building/classroom pair.
    pub async fn get_classroom_id(
        &self,
        building_number: i32,
        classroom_number: i32,
    ) -> Result<Rows, DbError> {
        self.executor
            .call(
                ProcedureCall::new("get_id_classroom")
                    .int(building_number)
                    .int(classroom_number),
            )
            .await
    }
}

/// Check a raw building number the way [`ClassroomRepo::get_all_classrooms_in_building`]
/// does: present, numeric and an integer.
///
/// Failures carry the catalog's `InvalidToken` code.
pub fn validate_building_number(raw: Option<&str>, errors: &ErrorCatalog) -> Result<i32, RepoError> {
    let mut inputs = Inputs::new();
    if let Some(value) = raw {
        inputs.insert(BUILDING_FIELD, value);
    }

    let validation = Validator::new().validate(&inputs, &[(BUILDING_FIELD, "required|numeric")])?;

    let failures = if validation.fails() {
        validation.into_failures()
    } else {
        match raw.map(str::trim).and_then(|v| v.parse::<i32>().ok()) {
            Some(building) => return Ok(building),
            None => vec![RuleFailure {
                field: BUILDING_FIELD.to_owned(),
                rule: "integer",
                kind: FailureKind::Rejected,
                message: format!("The {BUILDING_FIELD} must be an integer"),
            }],
        }
    };

    tracing::warn!(
        field = BUILDING_FIELD,
        value = raw.unwrap_or_default(),
        "rejected building number"
    );

    Err(RepoError::Validation {
        kind: ErrorCode::InvalidToken,
        code: errors.code(ErrorCode::InvalidToken),
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{MockExecutor, ProcArg};
    use crate::rows::row;
    use serde_json::json;

    #[test]
    fn building_number_checked_without_executor() {
        let errors = ErrorCatalog::default();
        assert_eq!(validate_building_number(Some(" 7 "), &errors).unwrap(), 7);

        let err = validate_building_number(Some("abc"), &errors).unwrap_err();
        assert_eq!(err.code(), Some("13"));
        let err = validate_building_number(Some("2.5"), &errors).unwrap_err();
        assert_eq!(err.code(), Some("13"));
    }

    fn classes() -> Rows {
        Rows::new(vec![
            row([("id", json!(1)), ("num_building", json!(2)), ("num_class", json!(101))]),
            row([("id", json!(2)), ("num_building", json!(2)), ("num_class", json!(102))]),
        ])
    }

    #[tokio::test]
    async fn in_building_issues_one_call_and_returns_rows() {
        let mock = MockExecutor::new();
        mock.add_response(classes());
        let errors = ErrorCatalog::default();
        let repo = ClassroomRepo::new(&mock, &errors);

        let rows = repo.get_all_classrooms_in_building(Some("2")).await.unwrap();

        assert_eq!(rows, classes());
        assert_eq!(
            mock.calls(),
            vec![ProcedureCall::new("get_all_classes_in_building").int(2)]
        );
    }

    #[tokio::test]
    async fn in_building_missing_value_is_code_13() {
        let mock = MockExecutor::new();
        let errors = ErrorCatalog::default();
        let repo = ClassroomRepo::new(&mock, &errors);

        let err = repo.get_all_classrooms_in_building(None).await.unwrap_err();

        assert_eq!(err.code(), Some("13"));
        assert_eq!(err.kind(), Some(ErrorCode::InvalidToken));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn in_building_rejects_non_numeric_without_query() {
        let mock = MockExecutor::new();
        let errors = ErrorCatalog::default();
        let repo = ClassroomRepo::new(&mock, &errors);

        for raw in ["abc", "", "   ", "2; DROP TABLE classes", "1.5", "1e3", "99999999999"] {
            let err = repo
                .get_all_classrooms_in_building(Some(raw))
                .await
                .unwrap_err();
            assert_eq!(err.code(), Some("13"), "input {raw:?}");
        }
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn in_building_failure_keeps_field_detail() {
        let mock = MockExecutor::new();
        let errors = ErrorCatalog::default();
        let repo = ClassroomRepo::new(&mock, &errors);

        match repo.get_all_classrooms_in_building(Some("abc")).await {
            Err(RepoError::Validation { failures, .. }) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].field, "num_building");
                assert_eq!(failures[0].rule, "numeric");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn in_building_code_follows_catalog() {
        let mock = MockExecutor::new();
        let errors = ErrorCatalog {
            token_prefix: "2".into(),
            ..Default::default()
        };
        let repo = ClassroomRepo::new(&mock, &errors);

        let err = repo.get_all_classrooms_in_building(Some("x")).await.unwrap_err();
        assert_eq!(err.code(), Some("23"));
    }

    #[tokio::test]
    async fn in_building_accepts_padded_integer() {
        let mock = MockExecutor::new();
        let errors = ErrorCatalog::default();
        let repo = ClassroomRepo::new(&mock, &errors);

        repo.get_all_classrooms_in_building(Some(" 7 ")).await.unwrap();
        assert_eq!(mock.calls()[0].args, vec![ProcArg::Int(7)]);
    }

    #[tokio::test]
    async fn by_id_renames_fields_and_keeps_order() {
        let mock = MockExecutor::new();
        mock.add_response(classes());
        let errors = ErrorCatalog::default();
        let repo = ClassroomRepo::new(&mock, &errors);

        let locations = repo.get_building_and_class_by_id(5).await.unwrap();

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].class_number, json!(101));
        assert_eq!(locations[1].class_number, json!(102));
        assert_eq!(
            serde_json::to_value(&locations[0]).unwrap(),
            json!({ "buildingNumber": 2, "classNumber": 101 })
        );
        assert_eq!(
            mock.calls(),
            vec![ProcedureCall::new("get_num_building_and_class_by_ID").int(5)]
        );
    }

    #[tokio::test]
    async fn by_id_missing_column_is_error() {
        let mock = MockExecutor::new();
        mock.add_response(Rows::new(vec![row([("num_building", json!(2))])]));
        let errors = ErrorCatalog::default();
        let repo = ClassroomRepo::new(&mock, &errors);

        let err = repo.get_building_and_class_by_id(5).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::MissingColumn {
                column: "num_class",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn mutations_call_their_procedures() {
        let mock = MockExecutor::returning(Rows::new(vec![row([(
            "add_classroom",
            json!("Record added"),
        )])]));
        let errors = ErrorCatalog::default();
        let repo = ClassroomRepo::new(&mock, &errors);

        let status = repo.add_classroom(3, 214).await.unwrap();
        assert_eq!(status.status_message(), Some("Record added"));
        repo.delete_classroom(3, 214).await.unwrap();
        repo.delete_building(3).await.unwrap();
        repo.get_classroom_id(3, 214).await.unwrap();

        assert_eq!(
            mock.calls(),
            vec![
                ProcedureCall::new("add_classroom").int(3).int(214),
                ProcedureCall::new("delete_classroom").int(3).int(214),
                ProcedureCall::new("delete_building").int(3),
                ProcedureCall::new("get_id_classroom").int(3).int(214),
            ]
        );
    }

    #[tokio::test]
    async fn listings_are_idempotent() {
        let mock = MockExecutor::returning(classes());
        let errors = ErrorCatalog::default();
        let repo = ClassroomRepo::new(&mock, &errors);

        let first = repo.get_all_classrooms().await.unwrap();
        let second = repo.get_all_classrooms().await.unwrap();
        assert_eq!(first, second);

        let buildings = repo.get_all_buildings().await.unwrap();
        assert_eq!(buildings, repo.get_all_buildings().await.unwrap());

        let names: Vec<_> = mock.calls().iter().map(|c| c.procedure).collect();
        assert_eq!(
            names,
            ["get_all_classes", "get_all_classes", "get_all_housing", "get_all_housing"]
        );
    }
}
