//! Failure taxonomy of an access grant.
//!
//! None of these reach the dispatcher as errors. The authorizer renders them
//! into the outcome's `error` text.

use std::io;
use std::net::AddrParseError;

use thiserror::Error;

/// How a child ended, e.g. `exited with status 1`.
pub(crate) fn describe_status(status: &Option<i32>) -> String {
    match *status {
        Some(code) => format!("exited with status {code}"),
        None => "terminated by signal".to_string(),
    }
}

fn with_detail(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {detail}")
    }
}

#[derive(Debug, Error)]
pub enum AccessError {
    /// The client address is not a dotted-quad IPv4 address.
    #[error("invalid client address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddrParseError,
    },

    /// The request environment named no client address at all.
    #[error("no client address in request environment")]
    MissingAddress,

    #[error(transparent)]
    Resolution(#[from] ResolutionFailure),

    #[error(transparent)]
    Grant(#[from] GrantFailure),
}

/// The ARP probe did not yield a hardware address. Never fatal.
#[derive(Debug, Error)]
pub enum ResolutionFailure {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} {}{}", describe_status(.status), with_detail(.detail))]
    Exit {
        program: String,
        status: Option<i32>,
        detail: String,
    },

    #[error("no hardware address found for {ip}")]
    NotFound { ip: String },
}

/// A firewall rule could not be installed.
#[derive(Debug, Error)]
pub enum GrantFailure {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Non-zero exit. Displays the tool's stderr verbatim when it wrote any.
    #[error("{}", rejection_text(.program, .status, .stderr))]
    Rejected {
        program: String,
        status: Option<i32>,
        stderr: String,
    },
}

fn rejection_text(program: &str, status: &Option<i32>, stderr: &str) -> String {
    if stderr.is_empty() {
        format!("{program} {}", describe_status(status))
    } else {
        stderr.to_string()
    }
}
