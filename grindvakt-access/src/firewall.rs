//! ## grindvakt-access::firewall
//! **Rule insertion through the host's packet-filter manager**
//!
//! Each grant is one elevated run of the firewall manager with an argument
//! vector rendered from configuration. The rule table itself is never
//! inspected: no duplicate suppression and no rollback.

use std::fmt;
use std::net::Ipv4Addr;

use grindvakt_config::{Placeholder, PortalConfig};
use tracing::debug;

use crate::arp::MacAddress;
use crate::error::GrantFailure;
use crate::runner::{CommandRunner, Invocation};
use crate::template;

/// What a firewall rule is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKey<'a> {
    Mac(&'a MacAddress),
    Ip(Ipv4Addr),
}

impl fmt::Display for RuleKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKey::Mac(mac) => write!(f, "MAC {mac}"),
            RuleKey::Ip(ip) => write!(f, "IP {ip}"),
        }
    }
}

pub struct Firewall<'a, R: ?Sized> {
    config: &'a PortalConfig,
    runner: &'a R,
}

impl<'a, R: CommandRunner + ?Sized> Firewall<'a, R> {
    pub fn new(config: &'a PortalConfig, runner: &'a R) -> Self {
        Self { config, runner }
    }

    /// The elevated command line that installs a rule for `key`.
    pub fn invocation(&self, key: RuleKey<'_>) -> Invocation {
        let args = match key {
            RuleKey::Mac(mac) => template::render(
                &self.config.iptables_mac,
                Placeholder::MacAddress,
                mac.as_str(),
            ),
            RuleKey::Ip(ip) => template::render(
                &self.config.iptables_ip,
                Placeholder::IpAddress,
                &ip.to_string(),
            ),
        };
        Invocation::new(&self.config.iptables_command, args)
            .elevated(&self.config.privilege_command)
    }

    /// Insert a rule for `key`. Succeeds only on exit status 0.
    pub fn grant(&self, key: RuleKey<'_>) -> Result<(), GrantFailure> {
        let invocation = self.invocation(key);
        debug!(command = %invocation, rule = %key, "inserting firewall rule");

        let output = self
            .runner
            .run(&invocation)
            .map_err(|source| GrantFailure::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        if output.success() {
            return Ok(());
        }

        Err(GrantFailure::Rejected {
            program: invocation.program,
            status: output.status,
            stderr: output.stderr.trim().to_string(),
        })
    }
}
