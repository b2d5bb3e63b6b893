//! Core module containing the entity, its field declarations and validation

pub mod entity;
pub mod error;
pub mod field;
pub mod schema;
pub mod validation;

pub use entity::{RequestEntity, RequestEntityBuilder, into_raw_input};
pub use error::{ConfigError, EntityError, ValidationError};
pub use field::{CustomAttributes, FieldRules, FieldSpec, Messages, ProjectedData, RawInput, RuleExpr};
pub use schema::RequestSchema;
pub use validation::{
    DefaultValidatorFactory, Rule, Translator, ValidationOutcome, ValidatorFactory,
    ValidatorRegistry,
};
