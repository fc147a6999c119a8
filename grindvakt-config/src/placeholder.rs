//! Named placeholders recognised inside command templates.

use std::fmt;

/// A `{name}` token substituted into a command template before it is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `{ip_address}`: the client's IPv4 address.
    IpAddress,
    /// `{mac_address}`: the hardware address discovered by the ARP probe.
    MacAddress,
}

impl Placeholder {
    /// The literal token as written in a template.
    pub const fn token(self) -> &'static str {
        match self {
            Placeholder::IpAddress => "{ip_address}",
            Placeholder::MacAddress => "{mac_address}",
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
