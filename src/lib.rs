//! # request-entity
//!
//! Binds raw request payloads to a declared field set and validates them.
//!
//! ## Features
//!
//! - **Projection**: input is restricted to the declared fields; unknown
//!   keys are dropped, missing ones become null
//! - **Rule expressions**: `"required|string|max:255"` or token lists,
//!   parsed when the declaration is built
//! - **Pluggable validation**: any [`ValidatorFactory`](core::ValidatorFactory)
//!   can evaluate the rules; a rule engine with `en` and `fr` messages ships
//!   with the crate
//! - **Declarative types**: [`request_schema!`] or YAML configuration
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use request_entity::prelude::*;
//!
//! request_schema!(
//!     CreateUser,
//!     fields: {
//!         name: "required|string|max:255",
//!         age: "nullable|integer|min:18",
//!     }
//! );
//!
//! let entity = RequestEntity::of::<CreateUser>()
//!     .json_str(r#"{"name": "Alice", "admin": true}"#)
//!     .build()?;
//!
//! assert!(entity.is_valid());
//! assert_eq!(entity.to_json()?, r#"{"name":"Alice","age":null}"#);
//! ```

pub mod config;
pub mod core;
pub mod entities;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Entity ===
    pub use crate::core::{
        entity::{RequestEntity, RequestEntityBuilder, into_raw_input},
        field::{CustomAttributes, FieldSpec, Messages, ProjectedData, RawInput, RuleExpr},
        schema::RequestSchema,
    };

    // === Validation ===
    pub use crate::core::validation::{
        DefaultValidatorFactory, MessageCatalog, Rule, Translator, ValidationOutcome,
        ValidatorFactory, ValidatorRegistry,
    };

    // === Errors ===
    pub use crate::core::error::{ConfigError, EntityError, ValidationError};

    // === Macros ===
    pub use crate::request_schema;

    // === Config ===
    pub use crate::config::{EntitiesConfig, EntityConfig};
}
