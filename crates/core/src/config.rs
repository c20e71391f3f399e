use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a validator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON deserialization failed.
    #[error("invalid validator config JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },
}

/// Knobs for [`BehaviorValidator`](crate::BehaviorValidator).
///
/// Missing JSON fields take their default values:
///
/// ```
/// let config = dfd_behavior_core::load_config_from_str("{}").unwrap();
/// assert_eq!(config, dfd_behavior_core::ValidatorConfig::default());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidatorConfig {
    /// Minimum number of characters of an input port name in a statement's
    /// input list. Shorter names make the statement structurally invalid.
    pub min_input_name_len: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_input_name_len: 1,
        }
    }
}

impl ValidatorConfig {
    /// Configuration matching the editor's historical grammar, where input
    /// names have at least two characters.
    pub fn source_compatible() -> Self {
        Self {
            min_input_name_len: 2,
        }
    }

    /// Check field ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_input_name_len == 0 {
            return Err(ConfigError::InvalidField {
                field: "minInputNameLen".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Load and validate a [`ValidatorConfig`] from JSON.
pub fn load_config_from_str(s: &str) -> Result<ValidatorConfig, ConfigError> {
    let config: ValidatorConfig = serde_json::from_str(s)?;
    config.validate()?;
    Ok(config)
}
