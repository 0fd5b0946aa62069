//! Scalar values carried through resolution, plus resolved instances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single configuration value at any point of the resolution pipeline.
///
/// Raw environment lookups produce `Str`; validators may coerce a value into
/// any of the typed variants. `Unset` models a variable that was absent from
/// the environment and had no declared default. `Null` is the published
/// sentinel that falsy values are normalized to, and never appears inside an
/// instance before publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigValue {
    /// No value: the variable was absent and no default was declared.
    Unset,
    /// Published sentinel for falsy values.
    Null,
    /// Raw or validated string.
    Str(String),
    /// Integer produced by a numeric validator.
    Int(i64),
    /// Floating-point number produced by a numeric validator.
    Float(f64),
    /// Boolean produced by the boolean validator.
    Bool(bool),
    /// Timestamp produced by the date validator.
    Date(DateTime<Utc>),
}

impl ConfigValue {
    /// Observed type label, used in validation error context.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Null => "null",
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Date(_) => "date",
        }
    }

    /// Whether publication normalizes this value to `Null`.
    ///
    /// Falsy values are `Unset`, `Null`, the empty string, `0`, `0.0`, NaN,
    /// and `false`.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Unset | Self::Null => true,
            Self::Str(s) => s.is_empty(),
            Self::Int(n) => *n == 0,
            Self::Float(f) => *f == 0.0 || f.is_nan(),
            Self::Bool(b) => !b,
            Self::Date(_) => false,
        }
    }

    /// String view of the value, when it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view of the value, when it is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view of the value; integers widen to `f64`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Boolean view of the value, when it is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Timestamp view of the value, when it is a date.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "unset"),
            Self::Null => write!(f, "null"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{}", d.to_rfc3339()),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for ConfigValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

/// One fully resolved instance of a declaration.
///
/// Fields keep their binding order. Instances are built once per resolution
/// pass and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigInstance {
    declaration: String,
    fields: Vec<(String, ConfigValue)>,
}

impl ConfigInstance {
    /// Create an empty instance for the named declaration.
    pub(crate) fn new(declaration: &str) -> Self {
        Self {
            declaration: declaration.to_string(),
            fields: Vec::new(),
        }
    }

    /// Name of the declaration this instance was resolved from.
    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    /// Resolved value of a field, if the field exists.
    pub fn get(&self, field: &str) -> Option<&ConfigValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Overwrite a field value, appending the field when it is new.
    pub(crate) fn set(&mut self, field: &str, value: ConfigValue) {
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field.to_string(), value)),
        }
    }

    /// Iterate fields in binding order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields on the instance.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the instance has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn falsy_values_cover_every_empty_shape() {
        assert!(ConfigValue::Unset.is_falsy());
        assert!(ConfigValue::Null.is_falsy());
        assert!(ConfigValue::Str(String::new()).is_falsy());
        assert!(ConfigValue::Int(0).is_falsy());
        assert!(ConfigValue::Float(0.0).is_falsy());
        assert!(ConfigValue::Float(f64::NAN).is_falsy());
        assert!(ConfigValue::Bool(false).is_falsy());

        assert!(!ConfigValue::Str("x".to_string()).is_falsy());
        assert!(!ConfigValue::Int(-1).is_falsy());
        assert!(!ConfigValue::Bool(true).is_falsy());
    }

    #[test]
    fn instance_set_overwrites_in_place_and_appends_new_fields() {
        let mut instance = ConfigInstance::new("Demo");
        instance.set("first", ConfigValue::Str("a".to_string()));
        instance.set("second", ConfigValue::Int(2));
        instance.set("first", ConfigValue::Str("b".to_string()));

        assert_eq!(instance.len(), 2);
        assert_eq!(instance.get("first"), Some(&ConfigValue::Str("b".into())));
        let order: Vec<&str> = instance.fields().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["first", "second"]);
    }
}
