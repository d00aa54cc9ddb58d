//! Name resolution seam for the URL validator.

use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, ToSocketAddrs};

/// Resolves a host name to network addresses.
///
/// The validator only needs "which addresses would this host reach right
/// now". Implementations must be safe to call from many threads at once.
pub trait Resolve: Send + Sync {
    /// Returns every address `host` resolves to.
    ///
    /// # Errors
    ///
    /// Any resolution failure. The validator treats errors as "skip the
    /// address check", not as a rejection.
    fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<IpAddr>>;
}

/// Resolver backed by the platform's standard name resolution.
///
/// Blocking and without its own timeout; callers on an async runtime should
/// run it on a blocking thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl Resolve for SystemResolver {
    fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<IpAddr>> {
        Ok((host, port)
            .to_socket_addrs()?
            .map(|addr| addr.ip())
            .collect())
    }
}

/// Fixed host → addresses table for tests and offline demos.
///
/// Hosts missing from the table fail to resolve.
///
/// ```
/// use seclab_core::resolve::{Resolve, StaticResolver};
///
/// let resolver = StaticResolver::new().with_host("ipfs.io", ["127.0.0.1".parse().unwrap()]);
/// assert_eq!(resolver.resolve("ipfs.io", 443).unwrap().len(), 1);
/// assert!(resolver.resolve("arweave.net", 443).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    hosts: HashMap<String, Vec<IpAddr>>,
}

impl StaticResolver {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `host` to `addrs`. Host names are matched case-insensitively.
    pub fn with_host(mut self, host: &str, addrs: impl IntoIterator<Item = IpAddr>) -> Self {
        self.hosts
            .insert(host.to_ascii_lowercase(), addrs.into_iter().collect());
        self
    }
}

impl Resolve for StaticResolver {
    fn resolve(&self, host: &str, _port: u16) -> io::Result<Vec<IpAddr>> {
        self.hosts
            .get(&host.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("no address for {host}"))
            })
    }
}
