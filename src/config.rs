//! Configuration
//!
//! Compiled defaults come from the rule registry; an optional YAML file
//! overlays them key by key:
//!
//! ```yaml
//! implicitTransaction: false
//! rules:
//!   multiple-locks:
//!     enabled: true
//!   drop-table:
//!     enabled: false
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::rules::{LintContext, RuleId, RuleRegistry};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Per-rule settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub enabled: bool,
}

/// Effective configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub rules: BTreeMap<RuleId, RuleConfig>,
    pub implicit_transaction: bool,
}

/// On-disk shape. Every key is optional; present keys replace the default.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    implicit_transaction: Option<bool>,
    #[serde(default)]
    rules: BTreeMap<String, RuleConfig>,
}

impl Config {
    /// Compiled defaults: each registered rule at its default enablement,
    /// implicit transactions on.
    pub fn default_for(registry: &RuleRegistry) -> Self {
        let rules = registry
            .iter()
            .map(|rule| {
                (
                    rule.id(),
                    RuleConfig {
                        enabled: rule.enabled_by_default(),
                    },
                )
            })
            .collect();

        Self {
            rules,
            implicit_transaction: true,
        }
    }

    /// Overlay the YAML file at `path` on top of `self`.
    pub fn overlay_file(self, path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.overlay_str(&contents)
    }

    /// Overlay a YAML document on top of `self`.
    ///
    /// An empty document changes nothing.
    pub fn overlay_str(mut self, yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(self);
        }
        let parsed: Option<ConfigFile> = serde_yaml::from_str(yaml)?;
        let Some(parsed) = parsed else {
            return Ok(self);
        };

        for (code, rule_config) in parsed.rules {
            let id = RuleId::from_str(&code)
                .map_err(|_| ConfigError::Validation(format!("unknown rule code '{code}'")))?;
            self.rules.insert(id, rule_config);
        }

        if let Some(implicit) = parsed.implicit_transaction {
            self.implicit_transaction = implicit;
        }

        Ok(self)
    }

    /// Whether the rule should run. A code with no entry is off.
    pub fn is_enabled(&self, id: RuleId) -> bool {
        self.rules.get(&id).is_some_and(|r| r.enabled)
    }

    pub fn lint_context(&self) -> LintContext {
        LintContext::new(self.implicit_transaction)
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut registry = RuleRegistry::new();
        registry.register_defaults();
        Self::default_for(&registry)
    }
}
