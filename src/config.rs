//! Server configuration from flags and environment.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;

use crate::url_policy::{DomainAllowlist, DEFAULT_ALLOWED_DOMAINS};

/// Runtime settings for the lab server.
///
/// Every flag can also be set through the environment variable shown in
/// `--help`; flags win over the environment.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "seclab-server",
    about = "Paired vulnerable/fixed IDOR and SSRF lab endpoints"
)]
pub struct LabConfig {
    /// Address to bind
    #[arg(long, env = "SECLAB_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Domain the fixed fetch may reach; repeat or comma-separate.
    /// Subdomains of each entry are allowed too.
    #[arg(
        long = "allowed-domain",
        env = "SECLAB_ALLOWED_DOMAINS",
        value_delimiter = ',',
        default_values_t = DEFAULT_ALLOWED_DOMAINS.map(String::from)
    )]
    pub allowed_domains: Vec<String>,

    /// Outbound fetch timeout in seconds, at least 1
    #[arg(
        long,
        env = "SECLAB_FETCH_TIMEOUT_SECS",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub fetch_timeout_secs: u64,
}

impl LabConfig {
    /// The configured allowlist, normalized.
    pub fn allowlist(&self) -> DomainAllowlist {
        DomainAllowlist::new(&self.allowed_domains)
    }

    /// Outbound fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> SocketAddr {
        (self.host, self.port).into()
    }
}
