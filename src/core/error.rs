//! Typed error handling for request entities
//!
//! Rule violations are never errors: they are reported as data through
//! [`ValidationOutcome`](crate::core::validation::ValidationOutcome). The
//! types here cover what the caller cannot recover from by fixing input:
//!
//! - [`ConfigError`]: broken rule declarations, missing locale catalogs,
//!   unreadable configuration files
//! - [`ValidationError`]: payloads that cannot be bound at all (not JSON,
//!   not an object)
//!
//! # Example
//!
//! ```rust,ignore
//! use request_entity::prelude::*;
//!
//! match RequestEntity::builder(fields).lang("xx").input(payload).build() {
//!     Ok(entity) => println!("{}", entity.to_json()?),
//!     Err(EntityError::Config(ConfigError::UnknownLocale { locale })) => {
//!         eprintln!("no messages for locale {}", locale);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T, E = EntityError> = std::result::Result<T, E>;

/// The main error type for request entities
#[derive(Debug, Error)]
pub enum EntityError {
    /// Configuration errors (rules, locales, config files, registry)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Payload binding errors
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Error response structure handed to a host application
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl EntityError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::Config(e) => e.error_code(),
            EntityError::Validation(e) => e.error_code(),
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors related to rule declarations and validator setup
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A rule token names no known rule
    #[error("Unknown rule '{rule}' declared for field '{field}'")]
    UnknownRule { field: String, rule: String },

    /// A rule token carries missing or malformed parameters
    #[error("Invalid parameter for rule '{rule}' on field '{field}': {message}")]
    InvalidRuleParameter {
        field: String,
        rule: String,
        message: String,
    },

    /// No message catalog exists for the requested locale
    #[error("No validation messages available for locale '{locale}'")]
    UnknownLocale { locale: String },

    /// An entity name is missing from the loaded configuration
    #[error("Entity '{name}' is not declared in the configuration")]
    UnknownEntity { name: String },

    /// Failed to parse a configuration document
    #[error("Failed to parse config{}: {message}", describe_file(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// IO failure while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },

    /// A validator factory is already registered for the process
    #[error("A global validator factory is already registered")]
    RegistryAlreadySet,
}

impl ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::UnknownRule { .. } => "UNKNOWN_RULE",
            ConfigError::InvalidRuleParameter { .. } => "INVALID_RULE_PARAMETER",
            ConfigError::UnknownLocale { .. } => "UNKNOWN_LOCALE",
            ConfigError::UnknownEntity { .. } => "UNKNOWN_ENTITY",
            ConfigError::ParseError { .. } | ConfigError::IoError { .. } => "CONFIG_ERROR",
            ConfigError::RegistryAlreadySet => "REGISTRY_ALREADY_SET",
        }
    }
}

fn describe_file(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors raised when a payload cannot be bound to an entity
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Invalid JSON format, or JSON that is not an object
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    /// Projected data could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
            ValidationError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for EntityError {
    fn from(err: serde_json::Error) -> Self {
        EntityError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}
