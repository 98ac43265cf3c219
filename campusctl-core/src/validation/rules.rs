//! Validation rules and the rule-string parser
//!
//! Rules are written the way request handlers declare them:
//! `"required|numeric"`, `"after:2024-01-01"`.

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::dates::parse_date;

/// Numeric strings: optional sign, decimals, exponent, surrounding blanks.
static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?\s*$").expect("invalid numeric regex")
});

/// A rule could not be evaluated (as opposed to evaluating to false)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("'{value}' is not a valid date")]
    MalformedInput { value: String },

    #[error("rule '{rule}' requires parameter '{param}'")]
    MissingParameter {
        rule: &'static str,
        param: &'static str,
    },

    #[error("unknown validation rule '{0}'")]
    UnknownRule(String),
}

/// A single named check over an optional input value
pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Message template; `:attribute` is replaced with the field name.
    fn message(&self) -> String;

    /// Implicit rules also run when the value is absent or blank.
    fn implicit(&self) -> bool {
        false
    }

    fn check(&self, value: Option<&str>) -> Result<bool, RuleError>;
}

/// Value must be present and not blank
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Rule for Required {
    fn name(&self) -> &'static str {
        "required"
    }

    fn message(&self) -> String {
        "The :attribute is required".to_string()
    }

    fn implicit(&self) -> bool {
        true
    }

    fn check(&self, value: Option<&str>) -> Result<bool, RuleError> {
        Ok(value.is_some_and(|v| !v.trim().is_empty()))
    }
}

/// Value must be a number (integer, decimal or exponent form)
#[derive(Debug, Clone, Copy, Default)]
pub struct Numeric;

impl Rule for Numeric {
    fn name(&self) -> &'static str {
        "numeric"
    }

    fn message(&self) -> String {
        "The :attribute must be numeric".to_string()
    }

    fn check(&self, value: Option<&str>) -> Result<bool, RuleError> {
        Ok(value.is_some_and(|v| NUMERIC_RE.is_match(v)))
    }
}

/// Value must be a date strictly after `time`.
///
/// Either side failing to parse as a date is [`RuleError::MalformedInput`];
/// `Ok(false)` means both parsed and the ordering did not hold.
#[derive(Debug, Clone)]
pub struct After {
    time: String,
    now: Option<DateTime<FixedOffset>>,
}

impl After {
    pub fn new(time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            now: None,
        }
    }

    /// Pin the reference used for `now`/`today`/... keywords. Naive dates
    /// are then read in the offset of `now` instead of the local zone.
    pub fn with_now(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn time(&self) -> &str {
        &self.time
    }
}

impl Rule for After {
    fn name(&self) -> &'static str {
        "after"
    }

    fn message(&self) -> String {
        format!("The :attribute must be a date after {}.", self.time)
    }

    fn check(&self, value: Option<&str>) -> Result<bool, RuleError> {
        let value = value.unwrap_or_default();
        match self.now {
            Some(now) => self.is_after(value, &now),
            None => self.is_after(value, &Local::now()),
        }
    }
}

impl After {
    fn is_after<Tz: TimeZone>(&self, value: &str, now: &DateTime<Tz>) -> Result<bool, RuleError> {
        let subject = parse_date(value, now).ok_or_else(|| RuleError::MalformedInput {
            value: value.to_owned(),
        })?;
        let time = parse_date(&self.time, now).ok_or_else(|| RuleError::MalformedInput {
            value: self.time.clone(),
        })?;

        Ok(time < subject)
    }
}

/// Parse a `|`-separated rule string into rule objects.
///
/// `now` pins the keyword reference for date rules; `None` uses the local
/// clock at check time.
pub fn parse_rules(
    definition: &str,
    now: Option<DateTime<FixedOffset>>,
) -> Result<Vec<Box<dyn Rule>>, RuleError> {
    definition.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let (name, param) = match entry.split_once(':') {
                Some((name, param)) => (name.trim(), Some(param.trim())),
                None => (entry, None),
            };

            let rule: Box<dyn Rule> = match name {
                "required" => Box::new(Required),
                "numeric" => Box::new(Numeric),
                "after" => {
                    let time = param.filter(|p| !p.is_empty()).ok_or(
                        RuleError::MissingParameter {
                            rule: "after",
                            param: "time",
                        },
                    )?;
                    let rule = After::new(time);
                    Box::new(match now {
                        Some(now) => rule.with_now(now),
                        None => rule,
                    })
                }
                other => return Err(RuleError::UnknownRule(other.to_owned())),
            };
            Ok(rule)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn noon() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-03-10T12:00:00+09:00").unwrap()
    }

    #[test]
    fn after_accepts_later_subject() {
        let rule = After::new("2024-01-01");
        assert_eq!(rule.check(Some("2024-06-01")), Ok(true));
    }

    #[test]
    fn after_rejects_earlier_subject() {
        let rule = After::new("2024-06-01");
        assert_eq!(rule.check(Some("2024-01-01")), Ok(false));
    }

    #[test]
    fn after_is_strict() {
        let rule = After::new("2024-06-01");
        assert_eq!(rule.check(Some("2024-06-01")), Ok(false));
    }

    #[test]
    fn after_malformed_subject_is_error() {
        let rule = After::new("2024-01-01");
        assert_eq!(
            rule.check(Some("someday")),
            Err(RuleError::MalformedInput {
                value: "someday".into()
            })
        );
        assert!(matches!(
            rule.check(None),
            Err(RuleError::MalformedInput { .. })
        ));
    }

    #[test]
    fn after_malformed_time_is_error() {
        let rule = After::new("later");
        assert_eq!(
            rule.check(Some("2024-01-01")),
            Err(RuleError::MalformedInput {
                value: "later".into()
            })
        );
    }

    #[test]
    fn after_keywords_use_pinned_now() {
        let rule = After::new("today").with_now(noon());
        assert_eq!(rule.check(Some("2024-03-10 09:00")), Ok(true));
        assert_eq!(rule.check(Some("2024-03-09")), Ok(false));
    }

    #[test]
    fn after_now_against_offset_value() {
        // 03:30 UTC is half an hour after noon in +09:00
        let rule = After::new("now").with_now(noon());
        assert_eq!(rule.check(Some("2024-03-10T03:30:00Z")), Ok(true));
        assert_eq!(rule.check(Some("2024-03-10T02:30:00Z")), Ok(false));
        assert_eq!(rule.check(Some("2024-03-10T12:30:00+09:00")), Ok(true));
    }

    #[test]
    fn after_local_clock_against_offset_value() {
        let hour_ahead = (chrono::Utc::now() + chrono::Duration::hours(1)).to_rfc3339();
        let hour_behind = (chrono::Utc::now() - chrono::Duration::hours(1)).to_rfc3339();
        let rule = After::new("now");
        assert_eq!(rule.check(Some(&hour_ahead)), Ok(true));
        assert_eq!(rule.check(Some(&hour_behind)), Ok(false));
    }

    #[test]
    fn after_naive_time_against_offset_value() {
        // naive 2024-03-10 12:00 read in +09:00 is 03:00 UTC
        let rule = After::new("2024-03-10 12:00").with_now(noon());
        assert_eq!(rule.check(Some("2024-03-10T03:00:01Z")), Ok(true));
        assert_eq!(rule.check(Some("2024-03-10T03:00:00Z")), Ok(false));
    }

    #[test]
    fn numeric_forms() {
        for ok in ["42", "-7", "+3", "1.5", ".5", "1e3", " 12 "] {
            assert_eq!(Numeric.check(Some(ok)), Ok(true), "{ok}");
        }
        for bad in ["abc", "", "12a", "0x1A", "1,5", "."] {
            assert_eq!(Numeric.check(Some(bad)), Ok(false), "{bad}");
        }
        assert_eq!(Numeric.check(None), Ok(false));
    }

    #[test]
    fn required_blank_fails() {
        assert_eq!(Required.check(Some("  ")), Ok(false));
        assert_eq!(Required.check(None), Ok(false));
        assert_eq!(Required.check(Some("0")), Ok(true));
    }

    #[test]
    fn parse_rule_string() {
        let rules = parse_rules("required|numeric", None).unwrap();
        let names: Vec<_> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["required", "numeric"]);

        let rules = parse_rules("after:2024-01-01", None).unwrap();
        assert_eq!(rules[0].check(Some("2024-06-01")), Ok(true));
    }

    #[test]
    fn parse_rule_errors() {
        assert_eq!(
            parse_rules("after", None).err(),
            Some(RuleError::MissingParameter {
                rule: "after",
                param: "time"
            })
        );
        assert_eq!(
            parse_rules("required|uuid", None).err(),
            Some(RuleError::UnknownRule("uuid".into()))
        );
    }

    proptest! {
        #[test]
        fn after_matches_date_ordering(a in 0i64..20_000, b in 0i64..20_000) {
            let epoch = chrono::NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
            let subject = (epoch + chrono::Duration::days(a)).format("%Y-%m-%d").to_string();
            let time = (epoch + chrono::Duration::days(b)).format("%Y-%m-%d").to_string();

            let result = After::new(time).check(Some(&subject)).unwrap();
            prop_assert_eq!(result, b < a);
        }
    }
}
