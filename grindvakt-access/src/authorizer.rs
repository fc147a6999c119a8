//! ## grindvakt-access::authorizer
//! **MAC-first access grant with IP fallback**
//!
//! 1. Validate the client address; an invalid one ends the call at once.
//! 2. Probe for the client's hardware address (best effort).
//! 3. If one was found, insert a MAC-keyed rule.
//! 4. Otherwise, or if that failed, insert an IP-keyed rule.
//!
//! At most one rule is installed per call. A failure from an earlier step
//! stays in the outcome's `error` text even when a later step succeeds; the
//! dispatcher has always received it that way.

use std::net::Ipv4Addr;

use grindvakt_config::PortalConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span, warn};

use crate::arp::ArpProbe;
use crate::error::AccessError;
use crate::firewall::{Firewall, RuleKey};
use crate::runner::CommandRunner;

/// Result handed back to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub error: Option<String>,
    pub failed: bool,
}

impl Outcome {
    /// A rule was installed. `error` may still carry an earlier failure.
    pub fn granted(error: Option<String>) -> Self {
        Self {
            error,
            failed: false,
        }
    }

    /// No rule could be installed.
    pub fn denied(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            failed: true,
        }
    }
}

impl From<AccessError> for Outcome {
    fn from(err: AccessError) -> Self {
        Outcome::denied(err.to_string())
    }
}

/// Parse a dotted-quad IPv4 client address.
pub fn parse_client_ip(address: &str) -> Result<Ipv4Addr, AccessError> {
    address
        .parse()
        .map_err(|source| AccessError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}

pub struct Authorizer<R> {
    config: PortalConfig,
    runner: R,
}

impl<R: CommandRunner> Authorizer<R> {
    pub fn new(config: PortalConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Grant network access to `client_ip`.
    pub fn authorize(&self, client_ip: &str) -> Outcome {
        let span = info_span!("authorize", client_ip);
        let _enter = span.enter();

        let ip = match parse_client_ip(client_ip) {
            Ok(ip) => ip,
            Err(err) => {
                error!(error = %err, "client IP address is invalid");
                return err.into();
            }
        };

        let mut pending: Option<String> = None;

        let mac = match ArpProbe::new(&self.config, &self.runner).resolve(ip) {
            Ok(mac) => {
                debug!(%mac, "found client hardware address");
                Some(mac)
            }
            Err(err) => {
                warn!(error = %err, "failed to get client hardware address");
                pending = Some(AccessError::from(err).to_string());
                None
            }
        };

        let firewall = Firewall::new(&self.config, &self.runner);

        if let Some(mac) = &mac {
            match firewall.grant(RuleKey::Mac(mac)) {
                Ok(()) => {
                    info!(%mac, "created firewall MAC rule");
                    return Outcome::granted(pending);
                }
                Err(err) => {
                    warn!(
                        command = %firewall.invocation(RuleKey::Mac(mac)),
                        error = %err,
                        "MAC rule failed"
                    );
                    pending = Some(AccessError::from(err).to_string());
                }
            }
        }

        debug!(%ip, "using client IP address");
        match firewall.grant(RuleKey::Ip(ip)) {
            Ok(()) => {
                info!(%ip, "created firewall IP rule");
                Outcome::granted(pending)
            }
            Err(err) => {
                warn!(
                    command = %firewall.invocation(RuleKey::Ip(ip)),
                    error = %err,
                    "IP rule failed"
                );
                AccessError::from(err).into()
            }
        }
    }
}
