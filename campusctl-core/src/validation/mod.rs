//! Rule-based input validation
//!
//! Inputs are named string fields; a field absent from the input map is
//! treated as missing. Only implicit rules (`required`) run on missing or
//! blank values, every other rule is skipped for them.

pub mod dates;
pub mod rules;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

pub use rules::{parse_rules, After, Numeric, Required, Rule, RuleError};

/// Raw request inputs keyed by field name
pub type Inputs<'a> = HashMap<&'a str, &'a str>;

/// Why a field failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Rule evaluated to false
    Rejected,
    /// Rule could not evaluate the value (e.g. not a date)
    Malformed,
}

/// One failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFailure {
    pub field: String,
    pub rule: &'static str,
    pub kind: FailureKind,
    pub message: String,
}

impl fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}: {})", self.message, self.field, self.rule)
    }
}

/// Outcome of validating a set of fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    failures: Vec<RuleFailure>,
}

impl Validation {
    pub fn fails(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn passes(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[RuleFailure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<RuleFailure> {
        self.failures
    }

    /// First failure recorded for `field`, if any.
    pub fn first(&self, field: &str) -> Option<&RuleFailure> {
        self.failures.iter().find(|f| f.field == field)
    }
}

/// Applies rule strings to named inputs
#[derive(Debug, Clone, Default)]
pub struct Validator {
    now: Option<DateTime<FixedOffset>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the reference time for relative date keywords.
    pub fn with_now(now: DateTime<FixedOffset>) -> Self {
        Self { now: Some(now) }
    }

    /// Validate `inputs` against `(field, rule string)` pairs.
    ///
    /// Fields are checked in the given order, rules left to right. A field
    /// stops at its first failing rule. Errors are reserved for rule
    /// strings that cannot be parsed.
    pub fn validate(
        &self,
        inputs: &Inputs<'_>,
        rules: &[(&str, &str)],
    ) -> Result<Validation, RuleError> {
        let mut validation = Validation::default();

        for (field, definition) in rules {
            let value = inputs.get(field).copied();
            let blank = value.map_or(true, |v| v.trim().is_empty());

            for rule in parse_rules(definition, self.now)? {
                if blank && !rule.implicit() {
                    continue;
                }

                let kind = match rule.check(value) {
                    Ok(true) => continue,
                    Ok(false) => FailureKind::Rejected,
                    Err(RuleError::MalformedInput { .. }) => FailureKind::Malformed,
                    Err(e) => return Err(e),
                };

                validation.failures.push(RuleFailure {
                    field: (*field).to_owned(),
                    rule: rule.name(),
                    kind,
                    message: rule.message().replace(":attribute", field),
                });
                break;
            }
        }

        Ok(validation)
    }
}
