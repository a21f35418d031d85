//! Rule tokens understood by the validator
//!
//! A rule definition is a pipe-delimited list of tokens such as
//! `required|string|max:255` or `in:DRAFT,PUBLISHED,ARCHIVED`.

use thiserror::Error;

/// A malformed rule definition. This is a programming error, not a client error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("unknown validation rule '{token}' on field '{field}'")]
    Unknown { field: String, token: String },

    #[error("invalid parameter '{param}' for rule '{rule}' on field '{field}'")]
    InvalidParam {
        field: String,
        rule: &'static str,
        param: String,
    },
}

/// A single parsed rule
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    String,
    Numeric,
    Integer,
    Boolean,
    Email,
    Array,
    Uuid,
    Slug,
    Min(f64),
    Max(f64),
    In(Vec<String>),
}

impl Rule {
    /// Token name as written in rule definitions
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::String => "string",
            Rule::Numeric => "numeric",
            Rule::Integer => "integer",
            Rule::Boolean => "boolean",
            Rule::Email => "email",
            Rule::Array => "array",
            Rule::Uuid => "uuid",
            Rule::Slug => "slug",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::In(_) => "in",
        }
    }

    /// Parse one token (`min:3`, `email`, ...) for the given field
    pub fn parse(field: &str, token: &str) -> Result<Self, RuleError> {
        let token = token.trim();
        let (name, param) = match token.split_once(':') {
            Some((name, param)) => (name.trim(), Some(param.trim())),
            None => (token, None),
        };

        let rule = match (name, param) {
            ("required", None) => Rule::Required,
            ("string", None) => Rule::String,
            ("numeric", None) => Rule::Numeric,
            ("integer", None) => Rule::Integer,
            ("boolean", None) => Rule::Boolean,
            ("email", None) => Rule::Email,
            ("array", None) => Rule::Array,
            ("uuid", None) => Rule::Uuid,
            ("slug", None) => Rule::Slug,
            ("min", Some(p)) => Rule::Min(parse_bound(field, "min", p)?),
            ("max", Some(p)) => Rule::Max(parse_bound(field, "max", p)?),
            ("in", Some(p)) => {
                let options: Vec<String> = p
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if options.is_empty() {
                    return Err(RuleError::InvalidParam {
                        field: field.to_string(),
                        rule: "in",
                        param: p.to_string(),
                    });
                }
                Rule::In(options)
            }
            _ => {
                return Err(RuleError::Unknown {
                    field: field.to_string(),
                    token: token.to_string(),
                })
            }
        };

        Ok(rule)
    }
}

fn parse_bound(field: &str, rule: &'static str, param: &str) -> Result<f64, RuleError> {
    param
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| RuleError::InvalidParam {
            field: field.to_string(),
            rule,
            param: param.to_string(),
        })
}

/// Ordered rules for one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRules {
    pub field: String,
    pub rules: Vec<Rule>,
}

impl FieldRules {
    pub fn parse(field: &str, definition: &str) -> Result<Self, RuleError> {
        let rules = definition
            .split('|')
            .filter(|t| !t.trim().is_empty())
            .map(|t| Rule::parse(field, t))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            field: field.to_string(),
            rules,
        })
    }

    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::Required)
    }
}

/// Parsed rules for a whole payload, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub(crate) fields: Vec<FieldRules>,
}

impl RuleSet {
    /// Parse `(field, "rule|rule:param")` pairs
    pub fn parse(definitions: &[(&str, &str)]) -> Result<Self, RuleError> {
        let fields = definitions
            .iter()
            .map(|(field, definition)| FieldRules::parse(field, definition))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { fields })
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.field.as_str())
    }
}
