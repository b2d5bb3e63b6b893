//! Configuration loading and management
//!
//! Request types can be declared in YAML instead of code:
//!
//! ```yaml
//! lang: en
//! entities:
//!   create_user:
//!     fields:
//!       name: required|string|max:255
//!       email: [required, email]
//!     messages:
//!       email.required: "We need your :attribute."
//!     attributes:
//!       email: email address
//! ```

use crate::core::entity::{RequestEntity, RequestEntityBuilder};
use crate::core::error::ConfigError;
use crate::core::field::{CustomAttributes, FieldSpec, Messages};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn default_lang() -> String {
    crate::core::entity::DEFAULT_LANG.to_string()
}

fn default_use_validator() -> bool {
    true
}

/// Configuration for one request type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Declared fields (field name -> rule expression)
    pub fields: FieldSpec,

    /// Message overrides
    #[serde(default)]
    pub messages: Messages,

    /// Attribute display names
    #[serde(default)]
    pub attributes: CustomAttributes,

    /// Locale overriding the top-level one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Whether binding input validates it right away
    #[serde(default = "default_use_validator")]
    pub use_validator: bool,
}

/// Complete configuration for a set of request types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitiesConfig {
    /// Locale used by entities that do not set their own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Request types by name
    #[serde(default)]
    pub entities: IndexMap<String, EntityConfig>,
}

impl Default for EntitiesConfig {
    fn default() -> Self {
        Self {
            lang: None,
            entities: IndexMap::new(),
        }
    }
}

impl EntitiesConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading entities config '{}'", path))?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Locale inherited by entities, `en` unless configured
    pub fn lang(&self) -> String {
        self.lang.clone().unwrap_or_else(default_lang)
    }

    /// Find the configuration of a request type
    pub fn get(&self, name: &str) -> Option<&EntityConfig> {
        self.entities.get(name)
    }

    /// Names of the declared request types
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.keys().map(String::as_str).collect()
    }

    /// Builder for an entity of the named request type
    pub fn entity(&self, name: &str) -> Result<RequestEntityBuilder, ConfigError> {
        let config = self.get(name).ok_or_else(|| ConfigError::UnknownEntity {
            name: name.to_string(),
        })?;

        Ok(RequestEntity::builder(config.fields.clone())
            .lang(config.lang.clone().unwrap_or_else(|| self.lang()))
            .messages(config.messages.clone())
            .attributes(config.attributes.clone())
            .use_validator(config.use_validator))
    }

    /// Merge several configurations into one
    ///
    /// Entities declared again in a later configuration replace earlier
    /// ones. The last configuration that sets a locale wins.
    pub fn merge(configs: Vec<EntitiesConfig>) -> Self {
        let mut merged = Self::default();
        for config in configs {
            if config.lang.is_some() {
                merged.lang = config.lang;
            }
            for (name, entity) in config.entities {
                if merged.entities.contains_key(&name) {
                    tracing::debug!(entity = %name, "entity config overridden by later config");
                }
                merged.entities.insert(name, entity);
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
lang: fr
entities:
  create_user:
    fields:
      name: required|string|max:255
      email: [required, email]
    attributes:
      email: adresse e-mail
  ping:
    lang: en
    use_validator: false
    fields:
      message: string
"#;

    #[test]
    fn test_default_config() {
        let config = EntitiesConfig::default();
        assert_eq!(config.lang, None);
        assert_eq!(config.lang(), "en");
        assert!(config.entities.is_empty());
    }

    #[test]
    fn test_parse_entities() {
        let config = EntitiesConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(config.lang.as_deref(), Some("fr"));
        assert_eq!(config.entity_names(), vec!["create_user", "ping"]);

        let user = config.get("create_user").unwrap();
        assert_eq!(user.fields.names(), vec!["name", "email"]);
        assert!(user.use_validator);
        assert_eq!(user.lang, None);

        let ping = config.get("ping").unwrap();
        assert!(!ping.use_validator);
        assert_eq!(ping.lang.as_deref(), Some("en"));
    }

    #[test]
    fn test_unknown_rule_fails_parsing() {
        let yaml = "entities:\n  broken:\n    fields:\n      name: shiny\n";
        let err = EntitiesConfig::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("Unknown rule 'shiny'"));
    }

    #[test]
    fn test_entity_builder_inherits_top_level_lang() {
        let config = EntitiesConfig::from_yaml_str(YAML).unwrap();
        let entity = config.entity("create_user").unwrap().build().unwrap();
        assert_eq!(entity.lang(), "fr");
        assert_eq!(entity.custom_attributes()["email"], "adresse e-mail");

        let ping = config.entity("ping").unwrap().build().unwrap();
        assert_eq!(ping.lang(), "en");
        assert!(!ping.uses_validator());
    }

    #[test]
    fn test_unknown_entity() {
        let config = EntitiesConfig::from_yaml_str(YAML).unwrap();
        let Err(err) = config.entity("missing") else {
            panic!("expected an unknown entity error");
        };
        assert_eq!(
            err,
            ConfigError::UnknownEntity {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_yaml_serialization() {
        let config = EntitiesConfig::from_yaml_str(YAML).unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();

        // Should be able to parse it back
        let parsed = EntitiesConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_merge_later_config_wins() {
        let first = EntitiesConfig::from_yaml_str(YAML).unwrap();
        let second = EntitiesConfig::from_yaml_str(
            "lang: en\nentities:\n  ping:\n    fields:\n      message: required\n",
        )
        .unwrap();

        let merged = EntitiesConfig::merge(vec![first, second]);
        assert_eq!(merged.lang.as_deref(), Some("en"));
        assert_eq!(merged.entity_names(), vec!["create_user", "ping"]);
        assert!(merged.get("ping").unwrap().use_validator);
        assert!(merged.get("ping").unwrap().fields.get("message").unwrap().has("required"));
    }

    #[test]
    fn test_merge_keeps_lang_when_later_config_has_none() {
        let first = EntitiesConfig::from_yaml_str(YAML).unwrap();
        let second = EntitiesConfig::from_yaml_str(
            "entities:\n  extra:\n    fields:\n      note: string\n",
        )
        .unwrap();
        assert_eq!(second.lang, None);

        let merged = EntitiesConfig::merge(vec![first, second]);
        assert_eq!(merged.lang(), "fr");
        let entity = merged.entity("extra").unwrap().build().unwrap();
        assert_eq!(entity.lang(), "fr");
    }

    #[test]
    fn test_no_lang_anywhere_defaults_to_english() {
        let config = EntitiesConfig::from_yaml_str(
            "entities:\n  extra:\n    fields:\n      note: string\n",
        )
        .unwrap();
        let entity = config.entity("extra").unwrap().build().unwrap();
        assert_eq!(entity.lang(), "en");
    }

    #[test]
    fn test_merge_empty() {
        let merged = EntitiesConfig::merge(vec![]);
        assert_eq!(merged, EntitiesConfig::default());
    }
}
