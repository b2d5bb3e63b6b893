//! Request entity: binds raw input to a declared field set
//!
//! ```rust
//! use request_entity::prelude::*;
//! use serde_json::json;
//!
//! let fields = FieldSpec::parse([("name", "required|string"), ("age", "integer")]).unwrap();
//! let entity = RequestEntity::builder(fields)
//!     .json(json!({ "name": "Alice", "extra": "ignored" }))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(entity.to_json().unwrap(), r#"{"name":"Alice","age":null}"#);
//! assert!(entity.is_valid());
//! ```

use crate::core::error::{ConfigError, EntityError, Result, ValidationError};
use crate::core::field::{CustomAttributes, FieldSpec, Messages, ProjectedData, RawInput};
use crate::core::schema::RequestSchema;
use crate::core::validation::{
    DefaultValidatorFactory, ValidationOutcome, ValidatorFactory, ValidatorRegistry, validators,
};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Default locale for validation messages
pub const DEFAULT_LANG: &str = "en";

/// Raw input restricted to a declared field set, plus its last validation
///
/// The projected data always holds exactly the declared fields: unknown
/// input keys are dropped and missing ones are null. Validation reads the
/// raw input, so rules may refer to keys that are not declared fields
/// (e.g. `password_confirmation`).
#[derive(Clone)]
pub struct RequestEntity {
    fields: FieldSpec,
    data: ProjectedData,
    raw_input: RawInput,
    messages: Messages,
    custom_attributes: CustomAttributes,
    lang: String,
    use_validator: bool,
    validator: Option<Arc<dyn ValidatorFactory>>,
    outcome: Option<ValidationOutcome>,
}

impl RequestEntity {
    /// Create an entity, binding `raw_input` if given
    ///
    /// Messages and attributes are stored before the input is bound, so
    /// the construction-time validation already uses them.
    pub fn new(
        fields: FieldSpec,
        raw_input: Option<RawInput>,
        messages: Option<Messages>,
        custom_attributes: Option<CustomAttributes>,
    ) -> Result<Self> {
        let mut builder = Self::builder(fields);
        if let Some(raw_input) = raw_input {
            builder = builder.input(raw_input);
        }
        if let Some(messages) = messages {
            builder = builder.messages(messages);
        }
        if let Some(custom_attributes) = custom_attributes {
            builder = builder.attributes(custom_attributes);
        }
        builder.build()
    }

    /// Start building an entity over `fields`
    pub fn builder(fields: FieldSpec) -> RequestEntityBuilder {
        RequestEntityBuilder::new(Ok(fields))
    }

    /// Start building an entity declared by a [`RequestSchema`] type
    pub fn of<S: RequestSchema>() -> RequestEntityBuilder {
        RequestEntityBuilder::new(S::fields())
            .lang(S::lang())
            .messages(S::messages())
            .attributes(S::attributes())
    }

    /// Create an entity from a JSON object payload
    pub fn from_json_str(fields: FieldSpec, json: &str) -> Result<Self> {
        Self::builder(fields).json_str(json).build()
    }

    /// Project `raw_input` onto the declared fields
    ///
    /// The projection is recomputed from scratch and the raw input is
    /// replaced, so a following `validate` checks this same payload. When
    /// validation is enabled it runs right away; the only possible error is
    /// a validator that cannot be resolved.
    pub fn make(&mut self, raw_input: RawInput) -> Result<&mut Self> {
        self.data = self
            .fields
            .names()
            .into_iter()
            .map(|field| {
                let value = raw_input.get(field).cloned().unwrap_or(Value::Null);
                (field.to_string(), value)
            })
            .collect();

        tracing::debug!(
            fields = self.data.len(),
            dropped = raw_input.keys().filter(|k| !self.fields.contains(k)).count(),
            "projected request input"
        );
        self.raw_input = raw_input;

        if self.use_validator {
            self.validate(None, None)?;
        }
        Ok(self)
    }

    /// Validate the raw input against the declared rules
    ///
    /// Given messages or attributes replace the stored ones entirely;
    /// `None` keeps what is stored. The outcome replaces any previous one;
    /// if no validator can be resolved, no outcome is kept at all.
    pub fn validate(
        &mut self,
        messages: Option<Messages>,
        custom_attributes: Option<CustomAttributes>,
    ) -> Result<&ValidationOutcome> {
        if let Some(messages) = messages {
            self.messages = messages;
        }
        if let Some(custom_attributes) = custom_attributes {
            self.custom_attributes = custom_attributes;
        }

        self.outcome = None;
        let factory = self.setup_validator()?;
        let outcome = factory.make(
            &self.raw_input,
            &self.fields,
            &self.messages,
            &self.custom_attributes,
        );
        tracing::debug!(
            passes = outcome.passes(),
            failed_fields = outcome.errors().len(),
            "validated request input"
        );

        let stored = self.outcome.insert(outcome);
        Ok(&*stored)
    }

    /// Resolve the validator: injected, then registered, then default
    fn setup_validator(&self) -> Result<Arc<dyn ValidatorFactory>, ConfigError> {
        if let Some(factory) = &self.validator {
            tracing::debug!(source = "injected", "resolved validator factory");
            return Ok(Arc::clone(factory));
        }
        if let Some(factory) = ValidatorRegistry::global() {
            tracing::debug!(source = "registry", "resolved validator factory");
            return Ok(factory);
        }
        tracing::debug!(source = "default", lang = %self.lang, "resolved validator factory");
        Ok(Arc::new(DefaultValidatorFactory::for_locale(&self.lang)?))
    }

    /// Outcome of the last validation, if any ran
    pub fn validator(&self) -> Option<&ValidationOutcome> {
        self.outcome.as_ref()
    }

    /// Whether the last validation passed; false if none ran
    pub fn is_valid(&self) -> bool {
        self.outcome.as_ref().is_some_and(ValidationOutcome::passes)
    }

    /// Projected data, declared fields only
    pub fn to_array(&self) -> &ProjectedData {
        &self.data
    }

    /// Projected data as a flat JSON object
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.data)
            .map_err(|e| EntityError::Validation(ValidationError::Serialization(e)))
    }

    /// Value of a field, `None` if it is undeclared, missing or null
    ///
    /// Empty strings, zero and `false` are returned as they are; see
    /// [`filled`](Self::filled) for the looser check.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(name).filter(|value| !value.is_null())
    }

    /// Value of a field, `None` if it is unset or empty
    ///
    /// Treats `""`, `"0"`, `0`, `false`, `[]` and `{}` as unset in
    /// addition to missing and null values.
    pub fn filled(&self, name: &str) -> Option<&Value> {
        self.data
            .get(name)
            .filter(|value| !validators::is_loosely_empty(value))
    }

    /// Replace the declared field set
    ///
    /// Meant for setting a type up; the projection is only recomputed by
    /// the next `make`.
    pub fn set_fields(&mut self, fields: FieldSpec) {
        self.fields = fields;
    }

    /// Replace the locale used when the default validator is built
    pub fn set_lang(&mut self, lang: impl Into<String>) {
        self.lang = lang.into();
    }

    pub fn fields(&self) -> &FieldSpec {
        &self.fields
    }

    pub fn raw_input(&self) -> &RawInput {
        &self.raw_input
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn custom_attributes(&self) -> &CustomAttributes {
        &self.custom_attributes
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn uses_validator(&self) -> bool {
        self.use_validator
    }
}

impl fmt::Debug for RequestEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestEntity")
            .field("fields", &self.fields.names())
            .field("data", &self.data)
            .field("lang", &self.lang)
            .field("use_validator", &self.use_validator)
            .field("injected_validator", &self.validator.is_some())
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl Serialize for RequestEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

/// Builder for [`RequestEntity`]
///
/// Errors from the declaration or the payload are kept until
/// [`build`](Self::build), so the chain never has to be broken up.
pub struct RequestEntityBuilder {
    fields: std::result::Result<FieldSpec, ConfigError>,
    input: Option<RawInput>,
    messages: Messages,
    custom_attributes: CustomAttributes,
    lang: String,
    use_validator: bool,
    validator: Option<Arc<dyn ValidatorFactory>>,
    error: Option<EntityError>,
}

impl RequestEntityBuilder {
    fn new(fields: std::result::Result<FieldSpec, ConfigError>) -> Self {
        Self {
            fields,
            input: None,
            messages: Messages::new(),
            custom_attributes: CustomAttributes::new(),
            lang: DEFAULT_LANG.to_string(),
            use_validator: true,
            validator: None,
            error: None,
        }
    }

    /// Raw input to bind on build
    pub fn input(mut self, raw_input: RawInput) -> Self {
        self.input = Some(raw_input);
        self
    }

    /// Raw input from a JSON value, which must be an object
    pub fn json(mut self, value: Value) -> Self {
        match into_raw_input(value) {
            Ok(raw_input) => self.input = Some(raw_input),
            Err(e) => self.error = Some(e.into()),
        }
        self
    }

    /// Raw input from a JSON document, which must hold an object
    pub fn json_str(self, json: &str) -> Self {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => self.json(value),
            Err(e) => Self {
                error: Some(e.into()),
                ..self
            },
        }
    }

    pub fn messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    pub fn attributes(mut self, custom_attributes: CustomAttributes) -> Self {
        self.custom_attributes = custom_attributes;
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Whether `make` validates right after projecting (default: true)
    pub fn use_validator(mut self, enabled: bool) -> Self {
        self.use_validator = enabled;
        self
    }

    /// Inject the validator factory, taking precedence over the registry
    pub fn validator<V: ValidatorFactory + 'static>(self, factory: V) -> Self {
        self.shared_validator(Arc::new(factory))
    }

    /// Inject an already shared validator factory
    pub fn shared_validator(mut self, factory: Arc<dyn ValidatorFactory>) -> Self {
        self.validator = Some(factory);
        self
    }

    /// Build the entity, binding the input if one was given
    pub fn build(self) -> Result<RequestEntity> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut entity = RequestEntity {
            fields: self.fields?,
            data: ProjectedData::new(),
            raw_input: RawInput::new(),
            messages: self.messages,
            custom_attributes: self.custom_attributes,
            lang: self.lang,
            use_validator: self.use_validator,
            validator: self.validator,
            outcome: None,
        };

        if let Some(raw_input) = self.input {
            entity.make(raw_input)?;
        }
        Ok(entity)
    }
}

impl fmt::Debug for RequestEntityBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestEntityBuilder")
            .field("fields", &self.fields.as_ref().map(FieldSpec::names))
            .field("input", &self.input)
            .field("lang", &self.lang)
            .field("use_validator", &self.use_validator)
            .field("injected_validator", &self.validator.is_some())
            .field("error", &self.error)
            .finish()
    }
}

/// Unwrap a JSON object into raw input
pub fn into_raw_input(value: Value) -> std::result::Result<RawInput, ValidationError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ValidationError::InvalidJson {
            message: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
