//! # Grindvakt Access
//!
//! Captive-portal access grants. A client is resolved to its hardware address
//! with an ARP probe and let through with a MAC-keyed firewall rule, falling
//! back to an IP-keyed rule when the address is unknown or the MAC rule fails.

pub mod arp;
pub mod authorizer;
pub mod error;
pub mod firewall;
pub mod plugin;
pub mod runner;
pub mod template;

pub use arp::{ArpProbe, MacAddress};
pub use authorizer::{Authorizer, Outcome};
pub use error::{AccessError, GrantFailure, ResolutionFailure};
pub use firewall::{Firewall, RuleKey};
pub use plugin::PluginRequest;
pub use runner::{CommandOutput, CommandRunner, Invocation, SystemRunner};
