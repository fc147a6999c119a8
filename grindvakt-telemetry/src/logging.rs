//! ## grindvakt-telemetry::logging
//! **Structured diagnostics on stderr**
//!
//! Standard output belongs to the outcome the dispatcher reads back, so every
//! log line goes to stderr. `RUST_LOG` takes precedence; otherwise the
//! plugin's `debug` key picks between `debug` and `info`.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct PluginLogger;

impl PluginLogger {
    /// Install the global subscriber. Returns `false` if one was already set.
    pub fn init(debug: bool) -> bool {
        let installed = fmt()
            .with_env_filter(Self::filter(debug))
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .is_ok();

        if installed && debug {
            tracing::debug!("debug logging enabled");
        }
        installed
    }

    /// Filter honouring `RUST_LOG`, falling back to the plugin's debug flag.
    pub fn filter(debug: bool) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(debug)))
    }
}

/// Level used when `RUST_LOG` is unset.
pub fn default_level(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}
