pub mod normalizer_config;
pub mod provider_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub use normalizer_config::NormalizerConfig;
pub use provider_config::ProviderConfig;

/// Top-level configuration, read from the `drift.toml` project file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DriftConfig {
    pub normalizer: NormalizerConfig,
    pub provider: ProviderConfig,
}

impl DriftConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Reject limits that would make every extraction degrade.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("normalizer.max_chain_depth", self.normalizer.max_chain_depth),
            ("normalizer.max_arg_depth", self.normalizer.max_arg_depth),
            ("normalizer.max_tree_depth", self.normalizer.max_tree_depth),
            ("normalizer.max_scope_depth", self.normalizer.max_scope_depth),
        ];
        for (field, value) in limits {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field: field.to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
        }
        if self.provider.max_file_size == Some(0) {
            return Err(ConfigError::Invalid {
                field: "provider.max_file_size".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
