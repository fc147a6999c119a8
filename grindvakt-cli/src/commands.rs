use std::fs;
use std::io::{self, Read};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use grindvakt_access::authorizer::parse_client_ip;
use grindvakt_access::{
    plugin, ArpProbe, Firewall, MacAddress, PluginRequest, RuleKey, SystemRunner,
};
use grindvakt_config::{ConfigSources, PortalConfig};
use grindvakt_telemetry::PluginLogger;

#[derive(Parser, Debug)]
#[command(name = "grindvakt", version, about)]
pub struct Cli {
    /// YAML base configuration, layered under environment and request values.
    #[arg(long, global = true, env = "GRINDVAKT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Grant access for a dispatcher request and print the outcome as JSON
    Authorize(AuthorizeArgs),
    /// Resolve a client IP address to its hardware address
    Resolve(ResolveArgs),
    /// Validate configuration and print the commands it would run
    CheckConfig(CheckConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AuthorizeArgs {
    /// JSON request file (`{"environ": {...}, "config": {...}}`); stdin when omitted
    #[arg(short, long)]
    pub request: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    #[arg(long)]
    pub ip: String,
}

#[derive(Args, Debug, Clone)]
pub struct CheckConfigArgs {
    /// Sample client address to render into the templates
    #[arg(long, default_value = "192.0.2.1")]
    pub ip: Ipv4Addr,
    /// Sample hardware address to render into the MAC template
    #[arg(long, default_value = "00:00:5e:00:53:01", value_parser = parse_mac)]
    pub mac: MacAddress,
}

fn parse_mac(value: &str) -> Result<MacAddress, String> {
    MacAddress::parse(value).ok_or_else(|| format!("'{value}' is not a MAC address"))
}

fn sources(base: Option<&Path>) -> ConfigSources {
    let sources = ConfigSources::new().with_env();
    match base {
        Some(path) => sources.base_file(path),
        None => sources,
    }
}

fn load_config(base: Option<&Path>) -> Result<PortalConfig> {
    let config = PortalConfig::load(&sources(base)).context("failed to load configuration")?;
    PluginLogger::init(config.debug);
    Ok(config)
}

pub fn run_command(cli: Cli) -> Result<ExitCode> {
    let base = cli.config.as_deref();
    match cli.command {
        Commands::Authorize(args) => run_authorize(args, base),
        Commands::Resolve(args) => run_resolve(args, base),
        Commands::CheckConfig(args) => run_check_config(args, base),
    }
}

fn read_request(path: Option<&Path>) -> Result<PluginRequest> {
    let raw = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read request {}", path.display()))?,
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read request from stdin")?;
            raw
        }
    };
    serde_json::from_str(&raw).context("request is not a valid plugin request")
}

fn run_authorize(args: AuthorizeArgs, base: Option<&Path>) -> Result<ExitCode> {
    let request = read_request(args.request.as_deref())?;

    let outcome = plugin::run_with_sources(&request, sources(base), SystemRunner, |debug| {
        PluginLogger::init(debug);
    });

    println!("{}", serde_json::to_string(&outcome)?);
    Ok(if outcome.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run_resolve(args: ResolveArgs, base: Option<&Path>) -> Result<ExitCode> {
    let ip = parse_client_ip(&args.ip)?;
    let config = load_config(base)?;
    let mac = ArpProbe::new(&config, &SystemRunner).resolve(ip)?;
    println!("{mac}");
    Ok(ExitCode::SUCCESS)
}

fn run_check_config(args: CheckConfigArgs, base: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(base)?;
    let probe = ArpProbe::new(&config, &SystemRunner);
    let firewall = Firewall::new(&config, &SystemRunner);

    println!("debug: {}", config.debug);
    println!("arping: {}", probe.invocation(args.ip));
    println!("iptables_mac: {}", firewall.invocation(RuleKey::Mac(&args.mac)));
    println!("iptables_ip: {}", firewall.invocation(RuleKey::Ip(args.ip)));
    Ok(ExitCode::SUCCESS)
}
