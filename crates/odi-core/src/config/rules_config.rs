//! Business rules file: sweep grid, selection rules, and zone thresholds.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{OrchestrationConfig, SelectionRules, ZoneRules};
use crate::errors::ConfigError;

/// Top-level rules. Any missing section takes its compiled defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub orchestration: OrchestrationConfig,
    #[serde(default)]
    pub selection_rules: SelectionRules,
    #[serde(default, alias = "zone_rules")]
    pub zone_classification: ZoneRules,
}

impl Default for RulesConfig {
    fn default() -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert("version".to_string(), serde_json::Value::from("1.0.0"));
        metadata.insert(
            "description".to_string(),
            serde_json::Value::from("Default ODI rules"),
        );
        Self {
            metadata,
            orchestration: OrchestrationConfig::default(),
            selection_rules: SelectionRules::default(),
            zone_classification: ZoneRules::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Yaml,
    Toml,
    Json,
}

impl RulesConfig {
    /// Load rules from a file, choosing the parser by extension:
    /// `.yml`/`.yaml` as YAML, `.toml` as TOML, anything else as JSON.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let format = match extension.as_deref() {
            Some("yml") | Some("yaml") => Format::Yaml,
            Some("toml") => Format::Toml,
            _ => Format::Json,
        };
        let rules = Self::parse(&content, format, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), "loaded rules config");
        Ok(rules)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, Format::Yaml, "<string>")
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, Format::Toml, "<string>")
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, Format::Json, "<string>")
    }

    fn parse(content: &str, format: Format, path: &str) -> Result<Self, ConfigError> {
        let parse_error = |message: String| ConfigError::ParseError {
            path: path.to_string(),
            message,
        };
        let rules: Self = match format {
            Format::Yaml => serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?,
            Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string()))?,
            Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?,
        };
        rules.validate()?;
        Ok(rules)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialize>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.orchestration.validate()?;
        self.selection_rules.validate()?;
        self.zone_classification.validate()
    }
}
