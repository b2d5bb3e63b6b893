//! Message catalogs and the translator used by the default validator
//!
//! Catalogs are YAML documents with two maps:
//!
//! ```yaml
//! messages:
//!   required: "The :attribute field is required."
//!   min.string: "The :attribute must be at least :min characters."
//! attributes:
//!   email: "email address"
//! ```
//!
//! Size rules use a typed key (`min.numeric`, `min.string`, `min.array`).
//! Catalogs for `en` and `fr` ship with the crate.

use crate::core::error::ConfigError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN_CATALOGS: &[(&str, &str)] = &[
    ("en", include_str!("../../../resources/lang/en.yaml")),
    ("fr", include_str!("../../../resources/lang/fr.yaml")),
];

/// Message lines and attribute names for one locale
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageCatalog {
    #[serde(default)]
    pub messages: IndexMap<String, String>,

    #[serde(default)]
    pub attributes: IndexMap<String, String>,
}

/// Looks up message lines for a locale
#[derive(Debug, Clone)]
pub struct Translator {
    locale: String,
    catalog: MessageCatalog,
}

impl Translator {
    pub fn new(locale: impl Into<String>, catalog: MessageCatalog) -> Self {
        Self {
            locale: locale.into(),
            catalog,
        }
    }

    /// Translator backed by a shipped catalog
    ///
    /// Regional tags fall back to their language (`en_US` → `en`).
    pub fn for_locale(locale: &str) -> Result<Self, ConfigError> {
        let language = locale
            .split(['_', '-'])
            .next()
            .unwrap_or(locale)
            .to_ascii_lowercase();

        let source = BUILTIN_CATALOGS
            .iter()
            .find(|(tag, _)| tag.eq_ignore_ascii_case(locale))
            .or_else(|| BUILTIN_CATALOGS.iter().find(|(tag, _)| *tag == language))
            .map(|(_, source)| *source);

        match source {
            Some(source) => Self::from_yaml_str(locale, source),
            None => {
                tracing::warn!(locale = %locale, "no validation message catalog for locale");
                Err(ConfigError::UnknownLocale {
                    locale: locale.to_string(),
                })
            }
        }
    }

    /// Translator backed by a YAML catalog string
    pub fn from_yaml_str(locale: impl Into<String>, yaml: &str) -> Result<Self, ConfigError> {
        let catalog: MessageCatalog = serde_yaml::from_str(yaml)?;
        Ok(Self::new(locale, catalog))
    }

    /// Translator backed by a YAML catalog file
    pub fn from_yaml_file(
        locale: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let catalog: MessageCatalog =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            })?;
        Ok(Self::new(locale, catalog))
    }

    /// Locales with a shipped catalog
    pub fn available_locales() -> Vec<&'static str> {
        BUILTIN_CATALOGS.iter().map(|(tag, _)| *tag).collect()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// Message line for a key such as `required` or `max.string`
    pub fn line(&self, key: &str) -> Option<&str> {
        self.catalog.messages.get(key).map(String::as_str)
    }

    /// Display name for a field, if the catalog declares one
    pub fn attribute(&self, field: &str) -> Option<&str> {
        self.catalog.attributes.get(field).map(String::as_str)
    }
}
