//! ## grindvakt-access::arp
//! **Hardware address discovery through an external ARP prober**
//!
//! The prober (iputils `arping`) prints one line per reply:
//!
//! ```text
//! Unicast reply from 192.168.1.50 [AA:BB:CC:DD:EE:FF]  0.734ms
//! ```
//!
//! Only lines answering for the probed address are considered.

use std::fmt;
use std::net::Ipv4Addr;

use grindvakt_config::{Placeholder, PortalConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::ResolutionFailure;
use crate::runner::{CommandRunner, Invocation};
use crate::template;

static MAC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new("([0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}").expect("MAC pattern is a valid regex")
});

/// A hardware address exactly as the prober printed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacAddress(String);

impl MacAddress {
    /// Accepts a single colon-separated 6-octet hex token.
    pub fn parse(token: &str) -> Option<Self> {
        MAC_PATTERN
            .find(token)
            .filter(|m| m.start() == 0 && m.end() == token.len())
            .map(|m| Self(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Find the hardware address answering for `ip` in the prober's output.
///
/// Stops at the first reply line that carries an extractable address.
pub fn parse_probe_output(stdout: &str, ip: Ipv4Addr) -> Option<MacAddress> {
    let reply = format!("Unicast reply from {ip} ");
    stdout
        .lines()
        .filter(|line| line.starts_with(&reply))
        .find_map(|line| MAC_PATTERN.find(line))
        .map(|m| MacAddress(m.as_str().to_string()))
}

/// Drives the ARP prober for one client address.
pub struct ArpProbe<'a, R: ?Sized> {
    config: &'a PortalConfig,
    runner: &'a R,
}

impl<'a, R: CommandRunner + ?Sized> ArpProbe<'a, R> {
    pub fn new(config: &'a PortalConfig, runner: &'a R) -> Self {
        Self { config, runner }
    }

    pub fn invocation(&self, ip: Ipv4Addr) -> Invocation {
        Invocation::new(
            &self.config.arping_command,
            template::render(&self.config.arping, Placeholder::IpAddress, &ip.to_string()),
        )
    }

    pub fn resolve(&self, ip: Ipv4Addr) -> Result<MacAddress, ResolutionFailure> {
        let invocation = self.invocation(ip);
        debug!(command = %invocation, "probing client hardware address");

        let output = self
            .runner
            .run(&invocation)
            .map_err(|source| ResolutionFailure::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        if !output.success() {
            return Err(ResolutionFailure::Exit {
                program: invocation.program,
                status: output.status,
                detail: output.stderr.trim().to_string(),
            });
        }

        parse_probe_output(&output.stdout, ip)
            .ok_or_else(|| ResolutionFailure::NotFound { ip: ip.to_string() })
    }
}
