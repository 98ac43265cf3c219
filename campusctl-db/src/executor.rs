//! Stored-procedure executor trait and implementations
//!
//! Every data-access operation is exactly one
//! `SELECT * FROM "<procedure>"($1, ..., $n)` round trip. Procedure names
//! are compile-time constants and arguments are always bound, never
//! spliced into the SQL text.
//!
//! - [`PgExecutor`]: real implementation over a sqlx `PgPool`
//! - [`MockExecutor`]: records calls and replays scripted rows for tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::DbError;
use crate::rows::{decode_row, Rows};

/// A bound procedure argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcArg {
    Int(i32),
    Text(String),
}

/// One stored-procedure invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureCall {
    pub procedure: &'static str,
    pub args: Vec<ProcArg>,
}

impl ProcedureCall {
    pub fn new(procedure: &'static str) -> Self {
        Self {
            procedure,
            args: Vec::new(),
        }
    }

    pub fn int(mut self, value: i32) -> Self {
        self.args.push(ProcArg::Int(value));
        self
    }

    pub fn text(mut self, value: impl Into<String>) -> Self {
        self.args.push(ProcArg::Text(value.into()));
        self
    }

    /// SQL text with one placeholder per argument.
    ///
    /// The name is always quoted so mixed-case procedures such as
    /// `get_num_building_and_class_by_ID` resolve as written.
    pub fn sql(&self) -> String {
        let placeholders = (1..=self.args.len())
            .map(|i| format!("${i}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("SELECT * FROM \"{}\"({})", self.procedure, placeholders)
    }
}

/// Capability to run a stored procedure and decode its result set
#[async_trait]
pub trait ProcedureExecutor: Send + Sync {
    async fn call(&self, call: ProcedureCall) -> Result<Rows, DbError>;
}

/// Executor backed by a Postgres connection pool
#[derive(Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProcedureExecutor for PgExecutor {
    async fn call(&self, call: ProcedureCall) -> Result<Rows, DbError> {
        let sql = call.sql();
        tracing::debug!(
            procedure = call.procedure,
            args = call.args.len(),
            "calling stored procedure"
        );

        let mut query = sqlx::query(&sql);
        for arg in &call.args {
            query = match arg {
                ProcArg::Int(v) => query.bind(*v),
                ProcArg::Text(v) => query.bind(v.as_str()),
            };
        }

        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!(procedure = call.procedure, error = %e, "stored procedure failed");
            DbError::from(e)
        })?;

        let decoded = rows.iter().map(decode_row).collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(procedure = call.procedure, rows = decoded.len(), "procedure returned");

        Ok(Rows::new(decoded))
    }
}

/// Mock executor for testing
///
/// Returns queued responses in order, then `fallback` (empty by default)
/// once the queue is drained.
#[derive(Default)]
pub struct MockExecutor {
    calls: Mutex<Vec<ProcedureCall>>,
    responses: Mutex<VecDeque<Rows>>,
    fallback: Rows,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that answers every call with the same rows.
    pub fn returning(rows: Rows) -> Self {
        Self {
            fallback: rows,
            ..Self::default()
        }
    }

    /// Add a response to return on the next call
    pub fn add_response(&self, rows: Rows) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(rows);
    }

    /// Calls seen so far, in order.
    pub fn calls(&self) -> Vec<ProcedureCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ProcedureExecutor for MockExecutor {
    async fn call(&self, call: ProcedureCall) -> Result<Rows, DbError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);

        let next = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        Ok(next.unwrap_or_else(|| self.fallback.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::row;
    use serde_json::json;

    #[test]
    fn sql_uses_placeholders() {
        let call = ProcedureCall::new("add_classroom").int(3).int(214);
        assert_eq!(call.sql(), r#"SELECT * FROM "add_classroom"($1, $2)"#);
    }

    #[test]
    fn sql_without_args() {
        let call = ProcedureCall::new("get_all_housing");
        assert_eq!(call.sql(), r#"SELECT * FROM "get_all_housing"()"#);
    }

    #[test]
    fn text_args_never_reach_sql() {
        let call = ProcedureCall::new("add_position").text("x'); DROP TABLE positions; --");
        assert_eq!(call.sql(), r#"SELECT * FROM "add_position"($1)"#);
        assert_eq!(
            call.args,
            vec![ProcArg::Text("x'); DROP TABLE positions; --".into())]
        );
    }

    #[tokio::test]
    async fn mock_returns_queued_then_fallback() {
        let mock = MockExecutor::returning(Rows::new(vec![row([("n", json!(0))])]));
        mock.add_response(Rows::new(vec![row([("n", json!(1))])]));

        let first = mock.call(ProcedureCall::new("a")).await.unwrap();
        let second = mock.call(ProcedureCall::new("b")).await.unwrap();

        assert_eq!(first.iter().next().unwrap()["n"], json!(1));
        assert_eq!(second.iter().next().unwrap()["n"], json!(0));

        let names: Vec<_> = mock.calls().iter().map(|c| c.procedure).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[tokio::test]
    async fn mock_empty_response() {
        let mock = MockExecutor::new();
        let rows = mock.call(ProcedureCall::new("get_all_classes")).await.unwrap();
        assert!(rows.is_empty());
    }
}
