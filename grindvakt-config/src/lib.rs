//! # Grindvakt Configuration
//!
//! Typed configuration for the captive-portal access plugin.
//!
//! The dispatcher hands the plugin a flat key/value mapping. It is layered over
//! an optional YAML base file and `GRINDVAKT_*` environment variables, then
//! extracted into [`PortalConfig`] and validated before any command runs.

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod flag;
mod placeholder;
mod provider;
mod validation;

pub use error::ConfigError;
pub use placeholder::Placeholder;
pub use provider::{ConfigProvider, ConfigSources};

/// Plugin configuration consumed by the access authorizer.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Enable debug-level diagnostics.
    #[serde(deserialize_with = "flag::deserialize_flag")]
    pub debug: bool,

    /// Arguments for the ARP prober, containing `{ip_address}`.
    #[validate(custom(function = validation::validate_arping_template))]
    pub arping: String,

    /// Arguments for the MAC-scoped firewall rule, containing `{mac_address}`.
    #[validate(custom(function = validation::validate_iptables_mac_template))]
    pub iptables_mac: String,

    /// Arguments for the IP-scoped firewall rule, containing `{ip_address}`.
    #[validate(custom(function = validation::validate_iptables_ip_template))]
    pub iptables_ip: String,

    /// ARP prober executable.
    #[validate(custom(function = validation::validate_program))]
    #[serde(default = "default_arping_command")]
    pub arping_command: String,

    /// Firewall manager executable.
    #[validate(custom(function = validation::validate_program))]
    #[serde(default = "default_iptables_command")]
    pub iptables_command: String,

    /// Elevation wrapper for the firewall manager. Empty runs it directly.
    #[validate(custom(function = validation::validate_privilege_command))]
    #[serde(default = "default_privilege_command")]
    pub privilege_command: String,
}

fn default_arping_command() -> String {
    "arping".into()
}

fn default_iptables_command() -> String {
    "iptables".into()
}

fn default_privilege_command() -> String {
    "sudo".into()
}

impl PortalConfig {
    /// Load configuration from any provider and validate it.
    pub fn load<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self, ConfigError> {
        Self::from_figment(provider.load()?)
    }

    /// Load configuration from a YAML file with `GRINDVAKT_*` overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load(&ConfigSources::new().base_file(path).with_env())
    }

    /// Extract and validate an already assembled figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Keys of templates whose single-space split yields empty or
    /// whitespace-carrying arguments. They are run as written.
    pub fn irregular_templates(&self) -> Vec<&'static str> {
        [
            ("arping", &self.arping),
            ("iptables_mac", &self.iptables_mac),
            ("iptables_ip", &self.iptables_ip),
        ]
        .into_iter()
        .filter(|(_, template)| validation::has_irregular_spacing(template))
        .map(|(key, _)| key)
        .collect()
    }
}
