//! Integration test for the process-wide validator factory
//!
//! Kept in its own test binary: registering a factory affects every entity
//! in the process.

use request_entity::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn host_factory(
    data: &RawInput,
    _rules: &FieldSpec,
    _messages: &Messages,
    _attributes: &CustomAttributes,
) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::new();
    if !data.contains_key("token") {
        outcome.add("token", "host validator: token missing");
    }
    outcome
}

#[test]
fn test_registry_resolution_order() {
    let fields = FieldSpec::parse([("name", "required")]).unwrap();

    // Nothing registered: the default factory is built from the locale
    assert!(!ValidatorRegistry::is_registered());
    let entity = RequestEntity::builder(fields.clone())
        .json(json!({}))
        .build()
        .unwrap();
    assert_eq!(
        entity.validator().unwrap().first("name"),
        Some("The name field is required.")
    );

    ValidatorRegistry::register(Arc::new(host_factory)).unwrap();
    assert!(ValidatorRegistry::is_registered());

    // A second registration is refused and the first one stays
    let err = ValidatorRegistry::register(Arc::new(host_factory)).unwrap_err();
    assert_eq!(err, ConfigError::RegistryAlreadySet);

    // Registered factory replaces the default, even for unknown locales
    let entity = RequestEntity::builder(fields.clone())
        .lang("xx")
        .json(json!({}))
        .build()
        .unwrap();
    let outcome = entity.validator().unwrap();
    assert!(!outcome.has("name"));
    assert_eq!(outcome.first("token"), Some("host validator: token missing"));

    // An injected factory still wins over the registry
    let entity = RequestEntity::builder(fields)
        .shared_validator(Arc::new(DefaultValidatorFactory::for_locale("en").unwrap()))
        .json(json!({}))
        .build()
        .unwrap();
    assert!(entity.validator().unwrap().has("name"));
}
