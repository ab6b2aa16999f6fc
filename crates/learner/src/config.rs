use crate::error::{LearnerError, Result};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;
use wordsense_meaning::SubexpressionMode;

/// Learner tuning knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LearnerConfig {
    /// Subexpression set used when resolving conceptual expressions
    pub subexpressions: SubexpressionMode,

    /// Largest word subset that may receive new senses in one pair
    /// (`None` = up to every word of the utterance)
    pub escalation_limit: Option<usize>,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            subexpressions: SubexpressionMode::Exact,
            escalation_limit: None,
        }
    }
}

impl LearnerConfig {
    /// Config matching partial meanings through `(HEAD * *)` forms
    #[must_use]
    pub fn generalized() -> Self {
        Self {
            subexpressions: SubexpressionMode::Generalized,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.escalation_limit == Some(0) {
            return Err(LearnerError::invalid_config(
                "escalation_limit must be > 0 (omit it to allow every subset size)",
            ));
        }
        Ok(())
    }

    /// Load a JSON or TOML config file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read learner config {}", path.display()))?;
        Self::from_bytes(&bytes)
            .with_context(|| format!("Learner config {} is invalid", path.display()))
    }

    /// Parse a JSON or TOML config document
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let value: serde_json::Value = match serde_json::from_slice(bytes) {
            Ok(value) => value,
            Err(json_err) => {
                let utf8 = std::str::from_utf8(bytes).map_err(|err| anyhow!("{json_err}; {err}"))?;
                let toml_value: toml::Value = toml::from_str(utf8).map_err(|toml_err| {
                    anyhow!("Config is not valid JSON or TOML ({json_err}); TOML parse error: {toml_err}")
                })?;
                serde_json::to_value(toml_value)
                    .map_err(|err| anyhow!("Failed to convert TOML config to JSON: {err}"))?
            }
        };

        let config: Self =
            serde_json::from_value(value).map_err(|err| anyhow!("Config parse error: {err}"))?;
        config.validate()?;
        Ok(config)
    }
}
