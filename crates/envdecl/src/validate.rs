//! Validator type and the built-in validator library.
//!
//! A validator is a pure check over a single value: it either returns a
//! (possibly coerced) replacement value or fails with a [`ValidationError`].
//! Validators attached to a field run left-to-right in declaration order,
//! each one feeding its output to the next.

use crate::error::ValidationError;
use crate::value::ConfigValue;
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// A reusable check applied to one field value during resolution.
#[derive(Clone)]
pub struct Validator {
    check: Arc<dyn Fn(&str, &ConfigValue) -> Result<ConfigValue, ValidationError> + Send + Sync>,
}

impl Validator {
    /// Wrap a check function into a validator.
    ///
    /// The function receives the field name (for message context) and the
    /// field's current value, and returns the value to store, which may be a
    /// coercion of the input.
    pub fn from_fn(
        check: impl Fn(&str, &ConfigValue) -> Result<ConfigValue, ValidationError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            check: Arc::new(check),
        }
    }

    /// Build a string-matching validator from a compiled pattern.
    ///
    /// Fails when the value is unset, empty, or not a string, or when the
    /// pattern does not match. The failure message names `label` when given,
    /// otherwise the pattern's textual form.
    pub fn from_regex(pattern: Regex, label: Option<&str>) -> Self {
        let label = label
            .map(|name| name.to_string())
            .unwrap_or_else(|| pattern.as_str().to_string());
        Self::from_fn(move |_key, value| match value {
            ConfigValue::Str(s) if !s.is_empty() && pattern.is_match(s) => {
                Ok(ConfigValue::Str(s.clone()))
            }
            _ => Err(ValidationError::new(format!(
                "value does not match the {label} pattern"
            ))),
        })
    }

    /// Run the check against a value.
    pub fn apply(&self, key: &str, value: &ConfigValue) -> Result<ConfigValue, ValidationError> {
        (self.check)(key, value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator")
    }
}

/// Bounds for the [`integer`] validator. `None` means unbounded.
///
/// Bounds are inclusive, and `Some(0)` is an effective bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntRange {
    /// Inclusive lower bound.
    pub from: Option<i64>,
    /// Inclusive upper bound.
    pub to: Option<i64>,
}

/// Length rules for the [`string`] validator. `None` means unchecked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrRule {
    /// Exact character count.
    pub with_length: Option<usize>,
    /// Inclusive minimum character count.
    pub from: Option<usize>,
    /// Inclusive maximum character count.
    pub to: Option<usize>,
}

/// Bounds for the [`any_number`] validator. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumRange {
    /// Inclusive lower bound.
    pub from: Option<f64>,
    /// Inclusive upper bound.
    pub to: Option<f64>,
}

/// Accepts integers, coercing string input; range-checked when bounds are set.
pub fn integer(range: IntRange) -> Validator {
    Validator::from_fn(move |_key, value| {
        let n = match value {
            ConfigValue::Int(n) => *n,
            ConfigValue::Str(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| ValidationError::new("value is not an integer"))?,
            _ => return Err(ValidationError::new("value is not an integer")),
        };
        if let Some(from) = range.from
            && n < from
        {
            return Err(ValidationError::new(format!(
                "value is below the minimum of {from}"
            )));
        }
        if let Some(to) = range.to
            && n > to
        {
            return Err(ValidationError::new(format!(
                "value is above the maximum of {to}"
            )));
        }
        Ok(ConfigValue::Int(n))
    })
}

/// Accepts strings, with optional exact/min/max character-length rules.
pub fn string(rule: StrRule) -> Validator {
    Validator::from_fn(move |_key, value| {
        let s = match value {
            ConfigValue::Str(s) => s,
            _ => return Err(ValidationError::new("value is not a string")),
        };
        let length = s.chars().count();
        if let Some(expected) = rule.with_length
            && length != expected
        {
            return Err(ValidationError::new(format!(
                "value must be exactly {expected} characters long"
            )));
        }
        if let Some(from) = rule.from
            && length < from
        {
            return Err(ValidationError::new(format!(
                "value must be at least {from} characters long"
            )));
        }
        if let Some(to) = rule.to
            && length > to
        {
            return Err(ValidationError::new(format!(
                "value must be at most {to} characters long"
            )));
        }
        Ok(ConfigValue::Str(s.clone()))
    })
}

/// Accepts any finite-or-fractional number, coercing string input.
pub fn any_number(range: NumRange) -> Validator {
    Validator::from_fn(move |_key, value| {
        let x = match value {
            ConfigValue::Float(x) => *x,
            ConfigValue::Int(n) => *n as f64,
            ConfigValue::Str(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::new("value is not a number"))?,
            _ => return Err(ValidationError::new("value is not a number")),
        };
        if x.is_nan() {
            return Err(ValidationError::new("value is not a number"));
        }
        if let Some(from) = range.from
            && x < from
        {
            return Err(ValidationError::new(format!(
                "value is below the minimum of {from}"
            )));
        }
        if let Some(to) = range.to
            && x > to
        {
            return Err(ValidationError::new(format!(
                "value is above the maximum of {to}"
            )));
        }
        Ok(ConfigValue::Float(x))
    })
}

/// RFC-5322-style email address pattern.
const EMAIL_PATTERN: &str = r#"(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])"#;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"));

/// Accepts strings that look like an email address.
pub fn email() -> Validator {
    Validator::from_regex(EMAIL_REGEX.clone(), Some("Email"))
}

/// Accepts `"true"`/`"false"`, coercing to a boolean; booleans pass through.
pub fn boolean() -> Validator {
    Validator::from_fn(|_key, value| match value {
        ConfigValue::Bool(b) => Ok(ConfigValue::Bool(*b)),
        ConfigValue::Str(s) if s == "true" => Ok(ConfigValue::Bool(true)),
        ConfigValue::Str(s) if s == "false" => Ok(ConfigValue::Bool(false)),
        _ => Err(ValidationError::new("value is not a boolean")),
    })
}

/// Accepts date strings, coercing to a UTC timestamp; dates pass through.
///
/// Recognized forms, tried in order: RFC 3339, `YYYY-MM-DD`, `DD.MM.YYYY`,
/// `MM/DD/YYYY`. Date-only forms resolve to UTC midnight.
pub fn date() -> Validator {
    Validator::from_fn(|_key, value| match value {
        ConfigValue::Date(d) => Ok(ConfigValue::Date(*d)),
        ConfigValue::Str(s) => parse_date(s)
            .map(ConfigValue::Date)
            .ok_or_else(|| ValidationError::new("value is not a date")),
        _ => Err(ValidationError::new("value is not a date")),
    })
}

/// Parse a date string using the supported formats.
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y"] {
        if let Ok(parsed) = NaiveDate::parse_from_str(s, format) {
            return Some(parsed.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn raw(s: &str) -> ConfigValue {
        ConfigValue::Str(s.to_string())
    }

    #[test]
    fn integer_accepts_plain_numbers() {
        let check = integer(IntRange::default());
        assert_eq!(check.apply("n", &raw("9999")), Ok(ConfigValue::Int(9999)));
    }

    #[test]
    fn integer_enforces_inclusive_bounds() {
        let check = integer(IntRange {
            from: Some(10),
            to: Some(20),
        });
        assert_eq!(check.apply("n", &raw("14")), Ok(ConfigValue::Int(14)));
        assert!(check.apply("n", &raw("123")).is_err());
        assert!(check.apply("n", &raw("9")).is_err());
    }

    #[test]
    fn integer_rejects_fractions_and_unset() {
        let check = integer(IntRange::default());
        assert!(check.apply("n", &raw("123.25")).is_err());
        assert!(check.apply("n", &raw("asd")).is_err());
        assert!(check.apply("n", &ConfigValue::Unset).is_err());
    }

    #[test]
    fn integer_zero_bound_is_effective() {
        let check = integer(IntRange {
            from: Some(0),
            to: None,
        });
        assert!(check.apply("n", &raw("-1")).is_err());
        assert_eq!(check.apply("n", &raw("0")), Ok(ConfigValue::Int(0)));
    }

    #[test]
    fn string_length_rules() {
        let exact = string(StrRule {
            with_length: Some(3),
            ..StrRule::default()
        });
        assert_eq!(exact.apply("s", &raw("asd")), Ok(raw("asd")));
        assert!(exact.apply("s", &raw("asde")).is_err());

        let ranged = string(StrRule {
            from: Some(5),
            to: Some(12),
            ..StrRule::default()
        });
        assert!(ranged.apply("s", &raw("asde")).is_err());
        assert_eq!(ranged.apply("s", &raw("asdef")), Ok(raw("asdef")));
    }

    #[test]
    fn string_rejects_non_strings() {
        let check = string(StrRule::default());
        assert!(check.apply("s", &ConfigValue::Int(3)).is_err());
        assert!(check.apply("s", &ConfigValue::Unset).is_err());
    }

    #[test]
    fn any_number_accepts_fractions_and_enforces_bounds() {
        let check = any_number(NumRange::default());
        assert_eq!(
            check.apply("x", &raw("123.25")),
            Ok(ConfigValue::Float(123.25))
        );
        assert!(check.apply("x", &raw("NaN")).is_err());
        assert!(check.apply("x", &ConfigValue::Unset).is_err());

        let bounded = any_number(NumRange {
            from: Some(0.0),
            to: Some(1.0),
        });
        assert!(bounded.apply("x", &raw("-0.5")).is_err());
        assert!(bounded.apply("x", &raw("1.5")).is_err());
        assert_eq!(bounded.apply("x", &raw("0.5")), Ok(ConfigValue::Float(0.5)));
    }

    #[test]
    fn boolean_coerces_literals_only() {
        let check = boolean();
        assert_eq!(check.apply("b", &raw("true")), Ok(ConfigValue::Bool(true)));
        assert_eq!(
            check.apply("b", &raw("false")),
            Ok(ConfigValue::Bool(false))
        );
        assert_eq!(
            check.apply("b", &ConfigValue::Bool(true)),
            Ok(ConfigValue::Bool(true))
        );
        assert!(check.apply("b", &raw("asd")).is_err());
        assert!(check.apply("b", &ConfigValue::Unset).is_err());
    }

    #[test]
    fn email_matches_addresses() {
        let check = email();
        assert_eq!(
            check.apply("e", &raw("email@domain.sub")),
            Ok(raw("email@domain.sub"))
        );
        assert!(check.apply("e", &raw("emaildomain.sub")).is_err());
        assert!(check.apply("e", &ConfigValue::Unset).is_err());
    }

    #[test]
    fn date_parses_supported_formats() {
        let check = date();
        let expected = Utc.with_ymd_and_hms(2021, 7, 12, 0, 0, 0).unwrap();
        assert_eq!(
            check.apply("d", &raw("12.07.2021")),
            Ok(ConfigValue::Date(expected))
        );
        assert_eq!(
            check.apply("d", &raw("2021-07-12")),
            Ok(ConfigValue::Date(expected))
        );
        assert!(check.apply("d", &raw("45.99.2021")).is_err());
        assert!(check.apply("d", &ConfigValue::Unset).is_err());
    }

    #[test]
    fn from_regex_failure_names_label_or_pattern() {
        let labeled = Validator::from_regex(Regex::new("^x+$").unwrap(), Some("Xs"));
        let err = labeled.apply("v", &raw("y")).unwrap_err();
        assert!(err.message.contains("Xs"));

        let unlabeled = Validator::from_regex(Regex::new("^x+$").unwrap(), None);
        let err = unlabeled.apply("v", &raw("y")).unwrap_err();
        assert!(err.message.contains("^x+$"));
    }

    #[test]
    fn from_fn_builds_custom_validators() {
        let upper = Validator::from_fn(|_key, value| match value {
            ConfigValue::Str(s) => Ok(ConfigValue::Str(s.to_uppercase())),
            other => Err(ValidationError::new(format!(
                "expected a string, got {}",
                other.type_name()
            ))),
        });
        assert_eq!(upper.apply("v", &raw("abc")), Ok(raw("ABC")));
        assert!(upper.apply("v", &ConfigValue::Int(1)).is_err());
    }
}
