//! ## grindvakt-cli
//! **Captive-portal access plugin**
//!
//! Invoked by the portal dispatcher once per client: reads the request,
//! inserts a firewall rule for the client and prints the outcome as JSON.
//! Diagnostics go to stderr.

use std::process::ExitCode;

use clap::Parser;

mod commands;

use commands::Cli;

fn main() -> anyhow::Result<ExitCode> {
    commands::run_command(Cli::parse())
}
