// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Engine Configuration
//!
//! Settings for the completion engine and the execute path.
//!
//! ## Configuration Structure
//!
//! - Default environment id used when a request does not carry one
//! - Completion list size and keyword casing
//! - Whether metadata lookups go through a memoizing cache
//! - Whether entity completion is restricted to custom entities
//!
//! ## Example
//!
//! ```rust
//! use dataverse_sql_engine::{EngineConfig, KeywordCasing};
//!
//! let settings = serde_json::json!({
//!     "dataverseSql": { "maxCompletionItems": 50, "keywordCasing": "lower" }
//! });
//! let config = EngineConfig::from_settings(&settings).unwrap();
//! assert_eq!(config.max_completion_items, 50);
//! assert_eq!(config.keyword_casing, KeywordCasing::Lower);
//! ```

use std::sync::Arc;

use dataverse_sql_catalog::{CachedCatalog, MetadataCatalog};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client settings section read by [`EngineConfig::from_settings`]
pub const SETTINGS_SECTION: &str = "dataverseSql";

/// Casing applied to keyword completions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordCasing {
    #[default]
    Upper,
    Lower,
}

impl KeywordCasing {
    pub fn apply(&self, keyword: &str) -> String {
        match self {
            KeywordCasing::Upper => keyword.to_uppercase(),
            KeywordCasing::Lower => keyword.to_lowercase(),
        }
    }
}

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Environment used when a request carries none
    pub environment_id: Option<String>,

    /// Upper bound on returned completion items
    pub max_completion_items: usize,

    /// Casing of keyword completions
    pub keyword_casing: KeywordCasing,

    /// Wrap the metadata catalog in a [`CachedCatalog`]
    pub cache_enabled: bool,

    /// Only offer custom entities in entity completion
    pub custom_entities_only: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            environment_id: None,
            max_completion_items: 200,
            keyword_casing: KeywordCasing::Upper,
            cache_enabled: true,
            custom_entities_only: false,
        }
    }
}

impl EngineConfig {
    /// Create a configuration bound to one environment
    pub fn new(environment_id: impl Into<String>) -> Self {
        Self {
            environment_id: Some(environment_id.into()),
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// Checks that:
    /// - The environment id, if set, is not blank
    /// - At least one completion item may be returned
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .environment_id
            .as_deref()
            .is_some_and(|env| env.trim().is_empty())
        {
            return Err(ConfigError::EmptyEnvironmentId);
        }

        if self.max_completion_items == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "maxCompletionItems".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        Ok(())
    }

    /// Parse engine config from a client settings payload.
    ///
    /// Expected shape:
    /// {
    ///   "dataverseSql": {
    ///     "environmentId": "...",
    ///     "maxCompletionItems": 200,
    ///     "keywordCasing": "upper" | "lower",
    ///     "cacheEnabled": true,
    ///     "customEntitiesOnly": false
    ///   }
    /// }
    ///
    /// A missing section yields the defaults; missing fields keep theirs.
    pub fn from_settings(settings: &Value) -> Result<Self, ConfigError> {
        let config = match settings.get(SETTINGS_SECTION) {
            Some(section) => Self::deserialize(section)
                .map_err(|e| ConfigError::InvalidSettings(e.to_string()))?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Environment for a request, falling back to the configured default
    pub fn resolve_environment<'a>(&'a self, requested: &'a str) -> Option<&'a str> {
        if requested.is_empty() {
            self.environment_id.as_deref()
        } else {
            Some(requested)
        }
    }

    /// Catalog the engine should query, honouring `cache_enabled`
    pub fn catalog(&self, inner: Arc<dyn MetadataCatalog>) -> Arc<dyn MetadataCatalog> {
        if self.cache_enabled {
            Arc::new(CachedCatalog::new(inner))
        } else {
            inner
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq, Serialize)]
pub enum ConfigError {
    /// Blank environment id
    #[error("Environment id must not be empty")]
    EmptyEnvironmentId,

    /// Setting out of range
    #[error("Invalid setting '{name}': {reason}")]
    InvalidSetting { name: String, reason: String },

    /// Settings payload has the wrong shape
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.cache_enabled);
        assert_eq!(config.keyword_casing, KeywordCasing::Upper);
    }

    #[test]
    fn test_validate_rejects_blank_environment() {
        let config = EngineConfig::new("  ");
        assert_eq!(config.validate(), Err(ConfigError::EmptyEnvironmentId));
    }

    #[test]
    fn test_validate_rejects_zero_items() {
        let config = EngineConfig {
            max_completion_items: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_from_settings() {
        let settings = json!({
            "dataverseSql": {
                "environmentId": "org-dev",
                "cacheEnabled": false,
                "customEntitiesOnly": true
            }
        });
        let config = EngineConfig::from_settings(&settings).unwrap();
        assert_eq!(config.environment_id.as_deref(), Some("org-dev"));
        assert!(!config.cache_enabled);
        assert!(config.custom_entities_only);
        assert_eq!(config.max_completion_items, 200);
    }

    #[test]
    fn test_from_settings_missing_section_uses_defaults() {
        let config = EngineConfig::from_settings(&json!({ "other": {} })).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_from_settings_wrong_type() {
        let settings = json!({ "dataverseSql": { "maxCompletionItems": "many" } });
        assert!(matches!(
            EngineConfig::from_settings(&settings),
            Err(ConfigError::InvalidSettings(_))
        ));

        let settings = json!({ "dataverseSql": { "maxCompletionItems": 0 } });
        assert!(matches!(
            EngineConfig::from_settings(&settings),
            Err(ConfigError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_resolve_environment() {
        let config = EngineConfig::new("default-env");
        assert_eq!(config.resolve_environment(""), Some("default-env"));
        assert_eq!(config.resolve_environment("other"), Some("other"));
        assert_eq!(EngineConfig::default().resolve_environment(""), None);
    }

    #[test]
    fn test_keyword_casing() {
        assert_eq!(KeywordCasing::Lower.apply("ORDER BY"), "order by");
        assert_eq!(KeywordCasing::Upper.apply("where"), "WHERE");
    }
}
