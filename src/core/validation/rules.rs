//! Typed rules parsed from rule expressions
//!
//! A rule token has the shape `name` or `name:param[,param...]`, e.g.
//! `required`, `max:255`, `in:draft,published`. Tokens are parsed once,
//! when the field declaration is built, so an entity never reaches
//! validation with a rule it cannot evaluate.

use crate::core::error::ConfigError;
use regex::Regex;
use std::fmt;

/// A single validation rule
#[derive(Clone)]
pub enum Rule {
    /// Stop evaluating the field after its first failure
    Bail,
    /// Present, not null, not blank, not an empty collection
    Required,
    /// A null value skips every other rule
    Nullable,
    /// Rules only run when the field is present in the input
    Sometimes,
    String,
    Integer,
    Numeric,
    Boolean,
    Array,
    Email,
    Url,
    Uuid,
    Alpha,
    AlphaNum,
    AlphaDash,
    Min(f64),
    Max(f64),
    Between(f64, f64),
    Size(f64),
    In(Vec<String>),
    NotIn(Vec<String>),
    Regex(Regex),
    /// chrono format string, e.g. `%Y-%m-%d`
    DateFormat(String),
    /// Input must also hold `<field>_confirmation` with the same value
    Confirmed,
    Same(String),
    Different(String),
}

impl Rule {
    /// Parse one rule token declared for `field`
    pub fn parse(field: &str, token: &str) -> Result<Self, ConfigError> {
        let token = token.trim();
        let (name, param) = match token.split_once(':') {
            Some((name, param)) => (name.trim(), Some(param)),
            None => (token, None),
        };

        let invalid = |message: &str| ConfigError::InvalidRuleParameter {
            field: field.to_string(),
            rule: name.to_string(),
            message: message.to_string(),
        };
        let list = || -> Result<Vec<String>, ConfigError> {
            let values: Vec<String> = param
                .unwrap_or_default()
                .split(',')
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect();
            if values.is_empty() {
                Err(invalid("expected at least one value"))
            } else {
                Ok(values)
            }
        };
        let number = |raw: Option<&str>| -> Result<f64, ConfigError> {
            raw.map(str::trim)
                .and_then(|p| p.parse::<f64>().ok())
                .filter(|n| n.is_finite())
                .ok_or_else(|| invalid("expected a number"))
        };
        let single = || -> Result<String, ConfigError> {
            param
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .ok_or_else(|| invalid("expected a parameter"))
        };

        let rule = match name {
            "bail" => Rule::Bail,
            "required" => Rule::Required,
            "nullable" => Rule::Nullable,
            "sometimes" => Rule::Sometimes,
            "string" => Rule::String,
            "integer" => Rule::Integer,
            "numeric" => Rule::Numeric,
            "boolean" => Rule::Boolean,
            "array" => Rule::Array,
            "email" => Rule::Email,
            "url" => Rule::Url,
            "uuid" => Rule::Uuid,
            "alpha" => Rule::Alpha,
            "alpha_num" => Rule::AlphaNum,
            "alpha_dash" => Rule::AlphaDash,
            "min" => Rule::Min(number(param)?),
            "max" => Rule::Max(number(param)?),
            "size" => Rule::Size(number(param)?),
            "between" => {
                let (low, high) = param
                    .and_then(|p| p.split_once(','))
                    .ok_or_else(|| invalid("expected two numbers"))?;
                let (low, high) = (number(Some(low))?, number(Some(high))?);
                if low > high {
                    return Err(invalid("lower bound exceeds upper bound"));
                }
                Rule::Between(low, high)
            }
            "in" => Rule::In(list()?),
            "not_in" => Rule::NotIn(list()?),
            "regex" => {
                let pattern = param.ok_or_else(|| invalid("expected a pattern"))?;
                let regex = compile_pattern(pattern).map_err(|e| invalid(&e.to_string()))?;
                Rule::Regex(regex)
            }
            "date_format" => Rule::DateFormat(single()?),
            "confirmed" => Rule::Confirmed,
            "same" => Rule::Same(single()?),
            "different" => Rule::Different(single()?),
            _ => {
                return Err(ConfigError::UnknownRule {
                    field: field.to_string(),
                    rule: name.to_string(),
                });
            }
        };

        Ok(rule)
    }

    /// Rule name, used as the message key
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Bail => "bail",
            Rule::Required => "required",
            Rule::Nullable => "nullable",
            Rule::Sometimes => "sometimes",
            Rule::String => "string",
            Rule::Integer => "integer",
            Rule::Numeric => "numeric",
            Rule::Boolean => "boolean",
            Rule::Array => "array",
            Rule::Email => "email",
            Rule::Url => "url",
            Rule::Uuid => "uuid",
            Rule::Alpha => "alpha",
            Rule::AlphaNum => "alpha_num",
            Rule::AlphaDash => "alpha_dash",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::Between(_, _) => "between",
            Rule::Size(_) => "size",
            Rule::In(_) => "in",
            Rule::NotIn(_) => "not_in",
            Rule::Regex(_) => "regex",
            Rule::DateFormat(_) => "date_format",
            Rule::Confirmed => "confirmed",
            Rule::Same(_) => "same",
            Rule::Different(_) => "different",
        }
    }

    /// Implicit rules run even when the field is absent or blank
    pub fn is_implicit(&self) -> bool {
        matches!(self, Rule::Required)
    }

    /// Rules that change how the others run instead of checking anything
    pub fn is_modifier(&self) -> bool {
        matches!(self, Rule::Bail | Rule::Nullable | Rule::Sometimes)
    }

    /// Size rules compare numbers, lengths or counts depending on the value
    pub fn is_size_rule(&self) -> bool {
        matches!(
            self,
            Rule::Min(_) | Rule::Max(_) | Rule::Between(_, _) | Rule::Size(_)
        )
    }

    /// Rules that make size rules compare the numeric value itself
    pub fn is_numeric_type(&self) -> bool {
        matches!(self, Rule::Integer | Rule::Numeric)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Min(n) | Rule::Max(n) | Rule::Size(n) => write!(f, "{}:{}", self.name(), n),
            Rule::Between(low, high) => write!(f, "between:{},{}", low, high),
            Rule::In(values) | Rule::NotIn(values) => {
                write!(f, "{}:{}", self.name(), values.join(","))
            }
            Rule::Regex(regex) => write!(f, "regex:{}", regex.as_str()),
            Rule::DateFormat(param) | Rule::Same(param) | Rule::Different(param) => {
                write!(f, "{}:{}", self.name(), param)
            }
            _ => f.write_str(self.name()),
        }
    }
}

/// Compile a pattern, accepting the delimited `/pattern/flags` form
fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let delimited = pattern
        .strip_prefix('/')
        .and_then(|rest| rest.rfind('/').map(|end| (&rest[..end], &rest[end + 1..])));

    match delimited {
        Some((body, flags)) => {
            let inline: String = flags.chars().filter(|c| "imsx".contains(*c)).collect();
            if inline.is_empty() {
                Regex::new(body)
            } else {
                Regex::new(&format!("(?{}){}", inline, body))
            }
        }
        None => Regex::new(pattern),
    }
}
