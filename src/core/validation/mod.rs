//! Validation capability
//!
//! Entities depend only on the [`ValidatorFactory`] trait. The crate ships a
//! rule engine ([`DefaultValidatorFactory`]) with localized messages, and a
//! process-wide [`ValidatorRegistry`] so a host can supply its own.

pub mod factory;
pub mod messages;
pub mod outcome;
pub mod registry;
pub mod rules;
pub mod validators;

pub use factory::{DefaultValidatorFactory, ValidatorFactory};
pub use messages::{MessageCatalog, Translator};
pub use outcome::ValidationOutcome;
pub use registry::ValidatorRegistry;
pub use rules::Rule;
