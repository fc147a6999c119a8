//! Configuration sources for the portal plugin.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::Serialize;

use crate::ConfigError;

/// Prefix of environment variables merged over the base file.
const ENV_PREFIX: &str = "GRINDVAKT_";

/// Trait for loading plugin configuration from different sources.
pub trait ConfigProvider {
    /// Loads the configuration and returns a Figment instance.
    fn load(&self) -> Result<Figment, ConfigError>;
}

/// The layered sources a plugin invocation draws its configuration from.
///
/// Lowest to highest priority:
/// 1. optional YAML base file,
/// 2. `GRINDVAKT_*` environment variables (when enabled),
/// 3. the key/value mapping handed over by the dispatcher.
#[derive(Debug)]
pub struct ConfigSources {
    base_file: Option<PathBuf>,
    use_env: bool,
    overrides: Figment,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            base_file: None,
            use_env: false,
            overrides: Figment::new(),
        }
    }
}

impl ConfigSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a YAML file underneath every other layer.
    pub fn base_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.base_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Merge `GRINDVAKT_*` environment variables over the base file.
    pub fn with_env(mut self) -> Self {
        self.use_env = true;
        self
    }

    /// Merge a flat key/value mapping over everything else.
    pub fn overrides<T: Serialize>(mut self, values: T) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(values));
        self
    }
}

impl ConfigProvider for ConfigSources {
    fn load(&self) -> Result<Figment, ConfigError> {
        let mut figment = Figment::new();

        if let Some(path) = &self.base_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            figment = figment.merge(Yaml::file(path));
        }

        if self.use_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX));
        }

        Ok(figment.merge(self.overrides.clone()))
    }
}
