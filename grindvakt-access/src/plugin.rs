//! Dispatcher entry point.
//!
//! The portal dispatcher calls a plugin with the client's request environment
//! and the plugin's configuration section:
//!
//! ```json
//! {
//!   "environ": { "REMOTE_ADDR": "10.0.0.7" },
//!   "config": { "debug": "False", "arping": "-c 1 {ip_address}", "...": "..." }
//! }
//! ```
//!
//! and expects an [`Outcome`] back. Nothing here fails with an error: every
//! problem becomes a denied outcome.

use std::collections::BTreeMap;

use grindvakt_config::{ConfigError, ConfigSources, PortalConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use crate::authorizer::{Authorizer, Outcome};
use crate::error::AccessError;
use crate::runner::CommandRunner;

/// Set by a reverse proxy in front of the portal.
pub const FORWARDED_FOR: &str = "HTTP_X_FORWARDED_FOR";
/// Peer address of the HTTP connection.
pub const REMOTE_ADDR: &str = "REMOTE_ADDR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginRequest {
    /// CGI-style request variables.
    #[serde(default)]
    pub environ: BTreeMap<String, Value>,
    /// The plugin's configuration section.
    #[serde(default)]
    pub config: BTreeMap<String, Value>,
}

impl PluginRequest {
    /// The client address: the forwarded-for header if present, else the peer.
    ///
    /// The header value is used verbatim.
    pub fn client_address(&self) -> Option<&str> {
        self.environ
            .get(FORWARDED_FOR)
            .or_else(|| self.environ.get(REMOTE_ADDR))
            .and_then(Value::as_str)
    }

    /// Layer the request's configuration section over `sources`.
    pub fn load_config(&self, sources: ConfigSources) -> Result<PortalConfig, ConfigError> {
        PortalConfig::load(&sources.overrides(&self.config))
    }
}

/// Authorize the client of `request` with an already loaded configuration.
pub fn authorize<R: CommandRunner>(
    request: &PluginRequest,
    config: PortalConfig,
    runner: R,
) -> Outcome {
    match request.client_address() {
        Some(address) => Authorizer::new(config, runner).authorize(address),
        None => {
            error!("request carries neither {FORWARDED_FOR} nor {REMOTE_ADDR}");
            AccessError::MissingAddress.into()
        }
    }
}

/// Full plugin call: build configuration from `sources` plus the request, then authorize.
///
/// `init_logging` receives the `debug` key once the configuration is known
/// (`false` when it could not be loaded) and runs before anything is logged.
pub fn run_with_sources<R, F>(
    request: &PluginRequest,
    sources: ConfigSources,
    runner: R,
    init_logging: F,
) -> Outcome
where
    R: CommandRunner,
    F: FnOnce(bool),
{
    match request.load_config(sources) {
        Ok(config) => {
            init_logging(config.debug);
            for key in config.irregular_templates() {
                warn!(key, "template splits into empty or whitespace arguments");
            }
            authorize(request, config, runner)
        }
        Err(err) => {
            init_logging(false);
            error!(error = %err, "plugin configuration rejected");
            Outcome::denied(err.to_string())
        }
    }
}

/// Plugin call configured solely by the dispatcher's mapping.
pub fn run<R: CommandRunner>(request: &PluginRequest, runner: R) -> Outcome {
    run_with_sources(request, ConfigSources::new(), runner, |_| {})
}
