//! Validator capability and the default rule engine
//!
//! An entity never evaluates rules itself. It hands its raw input and
//! declaration to a [`ValidatorFactory`] and keeps the resulting
//! [`ValidationOutcome`]. Any `Fn` with the right signature is a factory,
//! which keeps test doubles and host adapters small.

use super::messages::Translator;
use super::outcome::ValidationOutcome;
use super::rules::Rule;
use super::validators;
use crate::core::error::ConfigError;
use crate::core::field::{CustomAttributes, FieldRules, FieldSpec, Messages, RawInput};
use serde_json::Value;

/// Something that evaluates a field declaration against raw input
pub trait ValidatorFactory: Send + Sync {
    /// Evaluate `rules` against `data`
    fn make(
        &self,
        data: &RawInput,
        rules: &FieldSpec,
        messages: &Messages,
        attributes: &CustomAttributes,
    ) -> ValidationOutcome;
}

impl<F> ValidatorFactory for F
where
    F: Fn(&RawInput, &FieldSpec, &Messages, &CustomAttributes) -> ValidationOutcome + Send + Sync,
{
    fn make(
        &self,
        data: &RawInput,
        rules: &FieldSpec,
        messages: &Messages,
        attributes: &CustomAttributes,
    ) -> ValidationOutcome {
        self(data, rules, messages, attributes)
    }
}

/// Rule engine shipped with the crate
///
/// Evaluation follows these conventions:
///
/// - a field absent from the input only runs implicit rules (`required`)
/// - a blank string only runs implicit rules
/// - `nullable` makes a null value skip every rule
/// - `sometimes` makes an absent field skip every rule
/// - `bail` stops at the first failure of the field
/// - otherwise every failing rule contributes one message, in rule order
#[derive(Debug, Clone)]
pub struct DefaultValidatorFactory {
    translator: Translator,
}

impl DefaultValidatorFactory {
    pub fn new(translator: Translator) -> Self {
        Self { translator }
    }

    /// Factory with the shipped catalog for `locale`
    pub fn for_locale(locale: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(Translator::for_locale(locale)?))
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    fn validate_field(
        &self,
        field: &str,
        declared: &FieldRules,
        data: &RawInput,
        messages: &Messages,
        attributes: &CustomAttributes,
        outcome: &mut ValidationOutcome,
    ) {
        let value = data.get(field);

        if declared.has("sometimes") && value.is_none() {
            return;
        }
        if declared.has("nullable") && matches!(value, Some(Value::Null)) {
            return;
        }

        let bail = declared.has("bail");
        let numeric = declared.rules().iter().any(Rule::is_numeric_type);

        for rule in declared.rules() {
            if rule.is_modifier() || !is_validatable(rule, value) {
                continue;
            }

            let null = Value::Null;
            let current = value.unwrap_or(&null);
            if passes(rule, field, current, data, numeric) {
                continue;
            }

            tracing::debug!(field = %field, rule = rule.name(), "validation rule failed");
            let message = self.message(field, rule, current, numeric, messages, attributes);
            outcome.add(field, message);

            if bail {
                break;
            }
        }
    }

    fn message(
        &self,
        field: &str,
        rule: &Rule,
        value: &Value,
        numeric: bool,
        messages: &Messages,
        attributes: &CustomAttributes,
    ) -> String {
        let key = if rule.is_size_rule() {
            format!("{}.{}", rule.name(), size_kind(value, numeric))
        } else {
            rule.name().to_string()
        };

        let line = messages
            .get(&format!("{}.{}", field, rule.name()))
            .or_else(|| messages.get(rule.name()))
            .map(String::as_str)
            .or_else(|| self.translator.line(&key))
            .map(str::to_string)
            .unwrap_or_else(|| format!("validation.{}", key));

        let mut replacements = vec![(":attribute", self.display_name(field, attributes))];
        match rule {
            Rule::Min(n) => replacements.push((":min", format_number(*n))),
            Rule::Max(n) => replacements.push((":max", format_number(*n))),
            Rule::Size(n) => replacements.push((":size", format_number(*n))),
            Rule::Between(low, high) => {
                replacements.push((":min", format_number(*low)));
                replacements.push((":max", format_number(*high)));
            }
            Rule::In(values) | Rule::NotIn(values) => {
                replacements.push((":values", values.join(", ")))
            }
            Rule::DateFormat(format) => replacements.push((":format", format.clone())),
            Rule::Same(other) | Rule::Different(other) => {
                replacements.push((":other", self.display_name(other, attributes)))
            }
            _ => {}
        }

        replacements
            .into_iter()
            .fold(line, |line, (placeholder, value)| line.replace(placeholder, &value))
    }

    fn display_name(&self, field: &str, attributes: &CustomAttributes) -> String {
        attributes
            .get(field)
            .map(String::as_str)
            .or_else(|| self.translator.attribute(field))
            .map(str::to_string)
            .unwrap_or_else(|| field.replace('_', " "))
    }
}

impl ValidatorFactory for DefaultValidatorFactory {
    fn make(
        &self,
        data: &RawInput,
        rules: &FieldSpec,
        messages: &Messages,
        attributes: &CustomAttributes,
    ) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        for (field, declared) in rules.iter() {
            self.validate_field(field, declared, data, messages, attributes, &mut outcome);
        }
        outcome
    }
}

/// Whether a rule looks at the value at all
fn is_validatable(rule: &Rule, value: Option<&Value>) -> bool {
    if rule.is_implicit() {
        return true;
    }
    match value {
        None => false,
        Some(v) => !validators::is_blank_string(v),
    }
}

fn passes(rule: &Rule, field: &str, value: &Value, data: &RawInput, numeric: bool) -> bool {
    let size = || validators::size_of(value, numeric);

    match rule {
        Rule::Bail | Rule::Nullable | Rule::Sometimes => true,
        Rule::Required => validators::is_filled(value),
        Rule::String => validators::is_string(value),
        Rule::Integer => validators::is_integer(value),
        Rule::Numeric => validators::is_numeric(value),
        Rule::Boolean => validators::is_boolean(value),
        Rule::Array => validators::is_array(value),
        Rule::Email => validators::is_email(value),
        Rule::Url => validators::is_url(value),
        Rule::Uuid => validators::is_uuid(value),
        Rule::Alpha => validators::is_alpha(value),
        Rule::AlphaNum => validators::is_alpha_num(value),
        Rule::AlphaDash => validators::is_alpha_dash(value),
        Rule::Min(min) => size().is_some_and(|s| s >= *min),
        Rule::Max(max) => size().is_some_and(|s| s <= *max),
        Rule::Size(expected) => size().is_some_and(|s| s == *expected),
        Rule::Between(low, high) => size().is_some_and(|s| s >= *low && s <= *high),
        Rule::In(allowed) => validators::in_list(value, allowed),
        Rule::NotIn(denied) => validators::not_in_list(value, denied),
        Rule::Regex(regex) => {
            validators::scalar_string(value).is_some_and(|s| regex.is_match(&s))
        }
        Rule::DateFormat(format) => validators::matches_date_format(value, format),
        Rule::Confirmed => data.get(&format!("{}_confirmation", field)) == Some(value),
        Rule::Same(other) => match data.get(other) {
            Some(other) => other == value,
            None => value.is_null(),
        },
        Rule::Different(other) => data.get(other).is_some_and(|o| o != value),
    }
}

fn size_kind(value: &Value, numeric: bool) -> &'static str {
    if numeric {
        "numeric"
    } else if validators::is_array(value) {
        "array"
    } else {
        "string"
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> RawInput {
        value.as_object().cloned().unwrap_or_default()
    }

    fn run(fields: &[(&str, &str)], data: Value) -> ValidationOutcome {
        let spec = FieldSpec::parse(fields.iter().copied()).unwrap();
        DefaultValidatorFactory::for_locale("en").unwrap().make(
            &input(data),
            &spec,
            &Messages::new(),
            &CustomAttributes::new(),
        )
    }

    #[test]
    fn test_required_missing_field() {
        let outcome = run(&[("name", "required|string")], json!({}));
        assert_eq!(outcome.first("name"), Some("The name field is required."));
        assert_eq!(outcome.errors()["name"].len(), 1);
    }

    #[test]
    fn test_absent_optional_field_passes() {
        let outcome = run(
            &[("name", "required|string"), ("age", "integer")],
            json!({"name": "Alice", "extra": "ignored"}),
        );
        assert!(outcome.passes());
    }

    #[test]
    fn test_null_without_nullable_runs_type_rules() {
        let outcome = run(&[("age", "integer")], json!({"age": null}));
        assert_eq!(outcome.first("age"), Some("The age must be an integer."));
    }

    #[test]
    fn test_nullable_null_skips_rules() {
        let outcome = run(&[("age", "nullable|integer")], json!({"age": null}));
        assert!(outcome.passes());
    }

    #[test]
    fn test_blank_string_only_runs_implicit_rules() {
        assert!(run(&[("nick", "string|min:3")], json!({"nick": ""})).passes());
        assert!(run(&[("nick", "required|min:3")], json!({"nick": "  "})).fails());
    }

    #[test]
    fn test_every_failing_rule_reports() {
        let outcome = run(&[("code", "integer|min:10")], json!({"code": "ab"}));
        assert_eq!(
            outcome.errors()["code"],
            vec![
                "The code must be an integer.",
                "The code must be at least 10.",
            ]
        );
    }

    #[test]
    fn test_bail_stops_after_first_failure() {
        let outcome = run(&[("code", "bail|integer|min:10")], json!({"code": "ab"}));
        assert_eq!(outcome.errors()["code"].len(), 1);
    }

    #[test]
    fn test_sometimes_skips_absent_field() {
        assert!(run(&[("email", "sometimes|required|email")], json!({})).passes());
        assert!(run(&[("email", "sometimes|required|email")], json!({"email": "x"})).fails());
    }

    #[test]
    fn test_size_messages_depend_on_value_kind() {
        let outcome = run(
            &[("name", "max:3"), ("age", "integer|max:3"), ("tags", "array|max:1")],
            json!({"name": "abcd", "age": 4, "tags": ["a", "b"]}),
        );
        assert_eq!(
            outcome.first("name"),
            Some("The name may not be greater than 3 characters.")
        );
        assert_eq!(outcome.first("age"), Some("The age may not be greater than 3."));
        assert_eq!(
            outcome.first("tags"),
            Some("The tags may not have more than 1 items.")
        );
    }

    #[test]
    fn test_untyped_number_is_sized_by_its_digits() {
        let outcome = run(&[("n", "max:3"), ("m", "max:3")], json!({"n": 4, "m": 12345}));
        assert!(!outcome.has("n"));
        assert_eq!(
            outcome.first("m"),
            Some("The m may not be greater than 3 characters.")
        );
    }

    #[test]
    fn test_between_and_size() {
        let outcome = run(
            &[("pin", "size:4"), ("score", "numeric|between:1,10")],
            json!({"pin": "123", "score": "11.5"}),
        );
        assert_eq!(outcome.first("pin"), Some("The pin must be 4 characters."));
        assert_eq!(
            outcome.first("score"),
            Some("The score must be between 1 and 10.")
        );
    }

    #[test]
    fn test_confirmed_same_different() {
        let fields = [
            ("password", "confirmed"),
            ("email", "same:email_again"),
            ("new_pin", "different:old_pin"),
        ];
        let ok = run(
            &fields,
            json!({
                "password": "s3cret", "password_confirmation": "s3cret",
                "email": "a@b.co", "email_again": "a@b.co",
                "new_pin": "1234", "old_pin": "0000"
            }),
        );
        assert!(ok.passes());

        let bad = run(
            &fields,
            json!({
                "password": "s3cret", "password_confirmation": "other",
                "email": "a@b.co", "email_again": "c@d.co",
                "new_pin": "1234", "old_pin": "1234"
            }),
        );
        assert_eq!(
            bad.first("password"),
            Some("The password confirmation does not match.")
        );
        assert_eq!(
            bad.first("email"),
            Some("The email and email again must match.")
        );
        assert_eq!(
            bad.first("new_pin"),
            Some("The new pin and old pin must be different.")
        );
    }

    #[test]
    fn test_in_and_regex_and_date_format() {
        let outcome = run(
            &[
                ("status", "in:draft,published"),
                ("slug", "regex:^[a-z-]+$"),
                ("born", "date_format:%Y-%m-%d"),
            ],
            json!({"status": "gone", "slug": "Hello World", "born": "15/01/2024"}),
        );
        assert_eq!(outcome.first("status"), Some("The selected status is invalid."));
        assert_eq!(outcome.first("slug"), Some("The slug format is invalid."));
        assert_eq!(
            outcome.first("born"),
            Some("The born does not match the format %Y-%m-%d.")
        );
    }

    #[test]
    fn test_custom_messages_and_attributes() {
        let spec = FieldSpec::parse([("email", "required|email"), ("name", "required")]).unwrap();
        let mut messages = Messages::new();
        messages.insert("email.required".to_string(), "We need your :attribute.".to_string());
        messages.insert("required".to_string(), ":attribute is mandatory".to_string());
        let mut attributes = CustomAttributes::new();
        attributes.insert("email".to_string(), "e-mail address".to_string());

        let outcome = DefaultValidatorFactory::for_locale("en").unwrap().make(
            &RawInput::new(),
            &spec,
            &messages,
            &attributes,
        );
        assert_eq!(outcome.first("email"), Some("We need your e-mail address."));
        assert_eq!(outcome.first("name"), Some("name is mandatory"));
    }

    #[test]
    fn test_french_catalog() {
        let spec = FieldSpec::parse([("nom", "required")]).unwrap();
        let outcome = DefaultValidatorFactory::for_locale("fr").unwrap().make(
            &RawInput::new(),
            &spec,
            &Messages::new(),
            &CustomAttributes::new(),
        );
        assert_eq!(outcome.first("nom"), Some("Le champ nom est requis."));
    }

    #[test]
    fn test_missing_catalog_line_falls_back_to_key() {
        let translator = Translator::from_yaml_str("xx", "messages: {}").unwrap();
        let spec = FieldSpec::parse([("name", "max:2")]).unwrap();
        let outcome = DefaultValidatorFactory::new(translator).make(
            &input(json!({"name": "abc"})),
            &spec,
            &Messages::new(),
            &CustomAttributes::new(),
        );
        assert_eq!(outcome.first("name"), Some("validation.max.string"));
    }

    #[test]
    fn test_closure_is_a_factory() {
        let factory = |_: &RawInput, _: &FieldSpec, _: &Messages, _: &CustomAttributes| {
            let mut outcome = ValidationOutcome::new();
            outcome.add("any", "always fails");
            outcome
        };
        let outcome = factory.make(
            &RawInput::new(),
            &FieldSpec::new(),
            &Messages::new(),
            &CustomAttributes::new(),
        );
        assert!(outcome.fails());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(255.0), "255");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-3.0), "-3");
    }
}
