//! Validation commands - run rules without touching the database

use anyhow::Result;
use campusctl_core::validation::{After, Rule, RuleError};
use campusctl_core::{ErrorCode, Inputs, Validator};
use clap::{Parser, Subcommand};
use serde_json::json;

use super::{print_json, CodedFailure, Context};

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[command(subcommand)]
    pub command: ValidateCommand,
}

#[derive(Subcommand, Debug)]
pub enum ValidateCommand {
    /// Check that a date falls strictly after a reference time
    After {
        /// Date to check
        value: String,
        /// Reference time (date, datetime, or now/today/tomorrow/yesterday)
        #[arg(long)]
        time: String,
    },
    /// Check one field value against a rule string
    Check {
        /// Field name used in messages
        field: String,
        /// Value to check (omit to test a missing value)
        value: Option<String>,
        /// Rule string, e.g. "required|numeric"
        #[arg(long, short = 'r')]
        rules: String,
    },
}

pub fn run_validate(args: ValidateArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ValidateCommand::After { value, time } => {
            let rule = After::new(time);
            match rule.check(Some(&value)) {
                Ok(passes) => print_json(&json!({
                    "rule": rule.name(),
                    "value": value,
                    "time": rule.time(),
                    "passes": passes,
                })),
                Err(e @ RuleError::MalformedInput { .. }) => Err(CodedFailure::new(
                    "malformed_input",
                    ErrorCode::InvalidToken,
                    ctx.errors(),
                    e.to_string(),
                )
                .into()),
                Err(e) => Err(e.into()),
            }
        }
        ValidateCommand::Check {
            field,
            value,
            rules,
        } => {
            let mut inputs = Inputs::new();
            if let Some(value) = value.as_deref() {
                inputs.insert(field.as_str(), value);
            }

            let validation = Validator::new().validate(&inputs, &[(field.as_str(), rules.as_str())])?;
            if validation.passes() {
                return print_json(&json!({ "field": field, "passes": true }));
            }

            let failures = validation.into_failures();
            Err(CodedFailure {
                error: "validation_error",
                kind: ErrorCode::InvalidToken,
                code: ctx.errors().code(ErrorCode::InvalidToken),
                message: failures[0].message.clone(),
                failures,
            }
            .into())
        }
    }
}
