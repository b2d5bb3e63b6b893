//! Per-type field declarations
//!
//! Each concrete request type declares its fields once, through this trait.
//! The [`request_schema!`](crate::request_schema) macro generates the
//! implementation from a compact declaration.

use crate::core::error::ConfigError;
use crate::core::field::{CustomAttributes, FieldSpec, Messages};

/// Static declaration of a request type
pub trait RequestSchema {
    /// Declared fields and their rules
    fn fields() -> Result<FieldSpec, ConfigError>;

    /// Locale used when the default validator is built
    fn lang() -> &'static str {
        "en"
    }

    /// Message overrides applied to every instance
    fn messages() -> Messages {
        Messages::new()
    }

    /// Attribute display names applied to every instance
    fn attributes() -> CustomAttributes {
        CustomAttributes::new()
    }
}
