//! Field declarations and the data shapes bound against them

use crate::core::error::ConfigError;
use crate::core::validation::rules::Rule;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unvalidated source data, keyed by input name
pub type RawInput = Map<String, Value>;

/// Input restricted to the declared fields, in declaration order
pub type ProjectedData = IndexMap<String, Value>;

/// Rule-violation message overrides, keyed by `rule` or `field.rule`
pub type Messages = IndexMap<String, String>;

/// Display names used in place of field names inside messages
pub type CustomAttributes = IndexMap<String, String>;

/// A rule expression as written in a declaration
///
/// Either a pipe-delimited string (`"required|string|max:255"`) or an
/// ordered list of tokens. Use the list form when a parameter contains a
/// pipe, e.g. a `regex` alternation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleExpr {
    Pipe(String),
    Tokens(Vec<String>),
}

impl RuleExpr {
    /// Individual rule tokens, trimmed, without empty segments
    pub fn tokens(&self) -> Vec<&str> {
        let raw: Vec<&str> = match self {
            RuleExpr::Pipe(expr) => expr.split('|').collect(),
            RuleExpr::Tokens(tokens) => tokens.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

impl From<&str> for RuleExpr {
    fn from(expr: &str) -> Self {
        RuleExpr::Pipe(expr.to_string())
    }
}

impl From<String> for RuleExpr {
    fn from(expr: String) -> Self {
        RuleExpr::Pipe(expr)
    }
}

impl From<Vec<String>> for RuleExpr {
    fn from(tokens: Vec<String>) -> Self {
        RuleExpr::Tokens(tokens)
    }
}

impl From<Vec<&str>> for RuleExpr {
    fn from(tokens: Vec<&str>) -> Self {
        RuleExpr::Tokens(tokens.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RuleExpr {
    fn from(tokens: [&str; N]) -> Self {
        RuleExpr::Tokens(tokens.into_iter().map(str::to_string).collect())
    }
}

/// One declared field: its expression as written and the parsed rules
#[derive(Debug, Clone)]
pub struct FieldRules {
    expr: RuleExpr,
    rules: Vec<Rule>,
}

impl FieldRules {
    pub fn expr(&self) -> &RuleExpr {
        &self.expr
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Whether a rule with the given name is declared
    pub fn has(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.name() == name)
    }
}

/// The declared field set of an entity: field name → rule expression
///
/// Rule expressions are parsed on insertion, so holding a `FieldSpec`
/// means every rule in it can be evaluated.
#[derive(Debug, Clone, Default)]
pub struct FieldSpec {
    fields: IndexMap<String, FieldRules>,
}

impl FieldSpec {
    /// Create an empty declaration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole declaration at once
    ///
    /// ```rust
    /// use request_entity::core::FieldSpec;
    ///
    /// let fields = FieldSpec::parse([
    ///     ("name", "required|string|max:255"),
    ///     ("age", "integer"),
    /// ])
    /// .unwrap();
    /// assert_eq!(fields.names(), vec!["name", "age"]);
    /// ```
    pub fn parse<I, K, E>(declaration: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<RuleExpr>,
    {
        let mut spec = Self::new();
        for (field, expr) in declaration {
            spec.insert(field, expr)?;
        }
        Ok(spec)
    }

    /// Add a field, builder style
    pub fn with(mut self, field: impl Into<String>, expr: impl Into<RuleExpr>) -> Result<Self, ConfigError> {
        self.insert(field, expr)?;
        Ok(self)
    }

    /// Add or replace a field
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        expr: impl Into<RuleExpr>,
    ) -> Result<(), ConfigError> {
        let field = field.into();
        let expr = expr.into();
        let rules = expr
            .tokens()
            .into_iter()
            .map(|token| Rule::parse(&field, token))
            .collect::<Result<Vec<_>, _>>()?;
        self.fields.insert(field, FieldRules { expr, rules });
        Ok(())
    }

    /// Field names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.fields.get(field)
    }

    /// Parsed rules for a field
    pub fn rules(&self, field: &str) -> Option<&[Rule]> {
        self.fields.get(field).map(FieldRules::rules)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRules)> {
        self.fields.iter().map(|(name, rules)| (name.as_str(), rules))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The declaration as written
    pub fn expressions(&self) -> IndexMap<String, RuleExpr> {
        self.fields
            .iter()
            .map(|(name, rules)| (name.clone(), rules.expr.clone()))
            .collect()
    }
}

impl PartialEq for FieldSpec {
    fn eq(&self, other: &Self) -> bool {
        self.expressions() == other.expressions()
    }
}

impl TryFrom<IndexMap<String, RuleExpr>> for FieldSpec {
    type Error = ConfigError;

    fn try_from(declaration: IndexMap<String, RuleExpr>) -> Result<Self, Self::Error> {
        Self::parse(declaration)
    }
}

impl Serialize for FieldSpec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.expressions().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldSpec {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let declaration = IndexMap::<String, RuleExpr>::deserialize(deserializer)?;
        Self::try_from(declaration).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_tokens_are_trimmed() {
        let expr = RuleExpr::from(" required | string ||max:255 ");
        assert_eq!(expr.tokens(), vec!["required", "string", "max:255"]);
    }

    #[test]
    fn test_token_list_is_kept_whole() {
        let expr = RuleExpr::from(["required", "regex:^(a|b)$"]);
        assert_eq!(expr.tokens(), vec!["required", "regex:^(a|b)$"]);
    }

    #[test]
    fn test_parse_keeps_declaration_order() {
        let spec = FieldSpec::parse([("zeta", "string"), ("alpha", "integer"), ("mid", "")])
            .unwrap();
        assert_eq!(spec.names(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(spec.len(), 3);
        assert!(spec.rules("mid").unwrap().is_empty());
    }

    #[test]
    fn test_insert_replaces_existing_field() {
        let mut spec = FieldSpec::new();
        spec.insert("name", "string").unwrap();
        spec.insert("name", "required|string").unwrap();
        assert_eq!(spec.len(), 1);
        assert!(spec.get("name").unwrap().has("required"));
    }

    #[test]
    fn test_unknown_rule_rejected_at_declaration() {
        let err = FieldSpec::new().with("name", "required|shiny").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRule { .. }));
    }

    #[test]
    fn test_yaml_round_trip_of_declaration() {
        let yaml = "name: required|string\ntags:\n  - array\n  - max:3\n";
        let spec: FieldSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.names(), vec!["name", "tags"]);
        assert_eq!(
            spec.get("tags").unwrap().expr(),
            &RuleExpr::Tokens(vec!["array".to_string(), "max:3".to_string()])
        );

        let back: FieldSpec = serde_yaml::from_str(&serde_yaml::to_string(&spec).unwrap()).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_deserialize_rejects_unknown_rule() {
        let result: Result<FieldSpec, _> = serde_json::from_str(r#"{"name": "shiny"}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Unknown rule 'shiny'"));
    }
}
