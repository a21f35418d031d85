//! Rule-based payload validation
//!
//! Request payloads are checked against a [`RuleSet`] before they reach a
//! service. Each field's rules run in declaration order and the first
//! failing rule produces a [`ValidationError`] naming the field and rule.
//! Passing values are coerced (trimmed strings, numbers, booleans) and
//! returned as a [`Validated`] map that can be deserialized into a typed
//! request struct.

mod rules;

pub use rules::{FieldRules, Rule, RuleSet};

use crate::error::AppError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug pattern compiles"));

/// A client-caused validation failure
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub rule: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Prefix the field path, e.g. `quantity` -> `items.2.quantity`
    pub fn nested(mut self, prefix: &str) -> Self {
        self.field = format!("{}.{}", prefix, self.field);
        self
    }
}

/// Sanitized field values that passed validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validated(Map<String, Value>);

impl Validated {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deserialize the sanitized values into a typed request
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, AppError> {
        serde_json::from_value(Value::Object(self.0))
            .map_err(|e| AppError::Internal(format!("Validated payload did not match request type: {}", e)))
    }
}

impl RuleSet {
    /// Validate a JSON payload. Non-object payloads are treated as empty.
    pub fn validate(&self, payload: &Value) -> Result<Validated, ValidationError> {
        let empty = Map::new();
        let input = payload.as_object().unwrap_or(&empty);
        let mut output = Map::new();

        for field in &self.fields {
            if let Some(value) = check_field(field, input.get(&field.field))? {
                output.insert(field.field.clone(), value);
            }
        }

        Ok(Validated(output))
    }
}

/// Parse `rules` and validate `payload` against them in one step.
///
/// Malformed rule definitions surface as an internal error.
pub fn validate(payload: &Value, rules: &[(&str, &str)]) -> Result<Validated, AppError> {
    let rules = RuleSet::parse(rules).map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(rules.validate(payload)?)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn check_field(rules: &FieldRules, raw: Option<&Value>) -> Result<Option<Value>, ValidationError> {
    let field = rules.field.as_str();

    let Some(mut value) = raw.filter(|v| !is_blank(v)).cloned() else {
        if rules.is_required() {
            return Err(ValidationError::new(
                field,
                "required",
                format!("The {} field is required.", field),
            ));
        }
        return Ok(None);
    };

    for rule in &rules.rules {
        value = apply(rule, field, value)?;
    }

    Ok(Some(value))
}

fn apply(rule: &Rule, field: &str, value: Value) -> Result<Value, ValidationError> {
    let fail = |message: String| ValidationError::new(field, rule.name(), message);

    match rule {
        Rule::Required => Ok(value),

        Rule::String => match value {
            Value::String(s) => Ok(Value::String(s.trim().to_string())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            _ => Err(fail(format!("The {} field must be a string.", field))),
        },

        Rule::Numeric => to_number(&value)
            .map(Value::Number)
            .ok_or_else(|| fail(format!("The {} field must be a number.", field))),

        Rule::Integer => to_integer(&value)
            .map(|n| Value::Number(n.into()))
            .ok_or_else(|| fail(format!("The {} field must be an integer.", field))),

        Rule::Boolean => to_bool(&value)
            .map(Value::Bool)
            .ok_or_else(|| fail(format!("The {} field must be true or false.", field))),

        Rule::Email => match &value {
            Value::String(s) if EMAIL_RE.is_match(s.trim()) => Ok(Value::String(s.trim().to_string())),
            _ => Err(fail(format!("The {} field must be a valid email address.", field))),
        },

        Rule::Array => match value {
            Value::Array(_) => Ok(value),
            _ => Err(fail(format!("The {} field must be a list.", field))),
        },

        Rule::Uuid => match value.as_str().map(|s| uuid::Uuid::parse_str(s.trim())) {
            Some(Ok(id)) => Ok(Value::String(id.hyphenated().to_string())),
            _ => Err(fail(format!("The {} field must be a valid identifier.", field))),
        },

        Rule::Slug => match &value {
            Value::String(s) if SLUG_RE.is_match(s.trim()) => Ok(Value::String(s.trim().to_string())),
            _ => Err(fail(format!(
                "The {} field may only contain lowercase letters, digits and single hyphens.",
                field
            ))),
        },

        Rule::Min(bound) => {
            let (size, unit) = measure(&value)
                .ok_or_else(|| fail(format!("The {} field cannot be measured.", field)))?;
            if size < *bound {
                return Err(fail(format!(
                    "The {} field must be at least {}{}.",
                    field,
                    fmt_bound(*bound),
                    unit
                )));
            }
            Ok(value)
        }

        Rule::Max(bound) => {
            let (size, unit) = measure(&value)
                .ok_or_else(|| fail(format!("The {} field cannot be measured.", field)))?;
            if size > *bound {
                return Err(fail(format!(
                    "The {} field must not be greater than {}{}.",
                    field,
                    fmt_bound(*bound),
                    unit
                )));
            }
            Ok(value)
        }

        Rule::In(options) => {
            let literal = match &value {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            };
            match literal {
                Some(l) if options.iter().any(|o| *o == l) => Ok(value),
                _ => Err(fail(format!(
                    "The {} field must be one of: {}.",
                    field,
                    options.join(", ")
                ))),
            }
        }
    }
}

fn to_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(i.into());
            }
            s.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .and_then(Number::from_f64)
        }
        _ => None,
    }
}

fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "on" | "yes" => Some(true),
            "false" | "0" | "off" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Size used by `min`/`max`: numeric value, character count or element count
fn measure(value: &Value) -> Option<(f64, &'static str)> {
    match value {
        Value::Number(n) => n.as_f64().map(|f| (f, "")),
        Value::String(s) => Some((s.chars().count() as f64, " characters")),
        Value::Array(items) => Some((items.len() as f64, " items")),
        _ => None,
    }
}

fn fmt_bound(bound: f64) -> String {
    if bound.fract() == 0.0 {
        format!("{}", bound as i64)
    } else {
        bound.to_string()
    }
}
