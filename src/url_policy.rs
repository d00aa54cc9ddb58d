//! Outbound URL safety checks for the fixed metadata fetch.
//!
//! [`UrlValidator::validate`] decides whether the server may issue a GET to a
//! caller-supplied URL. The checks run in a fixed order and stop at the first
//! failure:
//!
//! 1. the string parses as an absolute URL
//! 2. the scheme is `http` or `https`
//! 3. the host is an allowlisted domain or a subdomain of one
//! 4. the host is resolved; a failed lookup skips step 5
//! 5. no resolved address is private-use, loopback, link-local or unspecified
//!
//! Resolution happens once, at validation time. The fetch resolves the name
//! again, so a DNS answer that changes in between is not caught.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use serde::Serialize;
use url::Url;

use crate::error::Violation;
use crate::resolve::{Resolve, SystemResolver};

/// Domains the fixed fetch may reach when no other list is configured.
pub const DEFAULT_ALLOWED_DOMAINS: [&str; 4] =
    ["ipfs.io", "arweave.net", "nftstorage.link", "example.com"];

/// Why a URL was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RejectReason {
    /// Not a parseable absolute URL
    InvalidFormat,
    /// Scheme other than http/https
    SchemeNotAllowed,
    /// Host is not an allowlisted domain or one of its subdomains
    DomainNotAllowlisted,
    /// Host resolved to an internal address
    PrivateOrLoopbackAddress,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "invalid URL format"),
            Self::SchemeNotAllowed => write!(f, "scheme not allowed"),
            Self::DomainNotAllowlisted => write!(f, "domain not allowlisted"),
            Self::PrivateOrLoopbackAddress => write!(f, "private or loopback address"),
        }
    }
}

/// Outcome of validating one URL.
///
/// Serializes as `{"allowed":true}` or
/// `{"allowed":false,"reason":"...","detail":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Whether the fetch may proceed
    pub allowed: bool,
    /// Rejection reason; `None` when allowed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
    /// Human-readable explanation; `None` when allowed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Decision {
    /// An approving decision.
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
            detail: None,
        }
    }

    /// A rejecting decision.
    pub fn deny(reason: RejectReason, detail: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
            detail: Some(detail.into()),
        }
    }

    /// Converts a rejection into the matching `Violation`.
    ///
    /// # Errors
    ///
    /// Returns a violation whose kind mirrors `reason` when not allowed.
    pub fn into_result(self) -> Result<(), Violation> {
        match self.reason {
            Some(reason) if !self.allowed => Err(Violation::new(
                reason.into(),
                self.detail.unwrap_or_else(|| reason.to_string()),
            )),
            _ => Ok(()),
        }
    }
}

/// Set of domains outbound fetches may target.
///
/// A host matches when it equals a listed domain or ends with `.` followed by
/// it, so `gateway.ipfs.io` matches `ipfs.io` but `evil-ipfs.io` does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainAllowlist {
    domains: Vec<String>,
}

impl DomainAllowlist {
    /// Builds an allowlist; entries are trimmed and lower-cased, blanks dropped.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = domains
            .into_iter()
            .map(|d| d.as_ref().trim().trim_matches('.').to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        normalized.sort();
        normalized.dedup();
        Self {
            domains: normalized,
        }
    }

    /// Returns true if `host` is permitted. `host` must already be lower-case.
    pub fn permits(&self, host: &str) -> bool {
        self.domains.iter().any(|domain| {
            host == domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    /// The normalized domains, sorted.
    pub fn domains(&self) -> &[String] {
        &self.domains
    }
}

impl Default for DomainAllowlist {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_DOMAINS)
    }
}

/// Decides whether an outbound fetch target is permitted.
///
/// Holds only immutable configuration and a shared resolver, so one instance
/// can serve every request concurrently.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use seclab_core::{DomainAllowlist, RejectReason, UrlValidator};
/// use seclab_core::resolve::StaticResolver;
///
/// let resolver = StaticResolver::new().with_host("ipfs.io", ["93.184.215.14".parse().unwrap()]);
/// let validator = UrlValidator::new(DomainAllowlist::default(), Arc::new(resolver));
///
/// assert!(validator.validate("https://ipfs.io/x").allowed);
/// assert_eq!(
///     validator.validate("https://evil-ipfs.io/x").reason,
///     Some(RejectReason::DomainNotAllowlisted)
/// );
/// ```
#[derive(Clone)]
pub struct UrlValidator {
    allowlist: DomainAllowlist,
    resolver: Arc<dyn Resolve>,
}

impl fmt::Debug for UrlValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlValidator")
            .field("allowlist", &self.allowlist)
            .finish_non_exhaustive()
    }
}

impl UrlValidator {
    /// Creates a validator with an explicit resolver.
    pub fn new(allowlist: DomainAllowlist, resolver: Arc<dyn Resolve>) -> Self {
        Self {
            allowlist,
            resolver,
        }
    }

    /// Creates a validator using the platform resolver.
    pub fn with_system_resolver(allowlist: DomainAllowlist) -> Self {
        Self::new(allowlist, Arc::new(SystemResolver))
    }

    /// The configured allowlist.
    pub fn allowlist(&self) -> &DomainAllowlist {
        &self.allowlist
    }

    /// Validates `input`. Performs at most one name lookup and nothing else.
    pub fn validate(&self, input: &str) -> Decision {
        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(e) => {
                return Decision::deny(
                    RejectReason::InvalidFormat,
                    format!("Invalid URL format: {e}"),
                )
            }
        };

        // Url already lower-cases the scheme.
        if !matches!(url.scheme(), "http" | "https") {
            return Decision::deny(
                RejectReason::SchemeNotAllowed,
                "Only HTTP and HTTPS protocols are allowed",
            );
        }

        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        if !self.allowlist.permits(&host) {
            return Decision::deny(
                RejectReason::DomainNotAllowlisted,
                format!("Domain not in allowlist: {host}"),
            );
        }

        let port = url.port_or_known_default().unwrap_or(80);
        match self.resolver.resolve(&host, port) {
            Ok(addrs) => {
                if let Some(ip) = addrs.into_iter().find(|ip| is_private_or_loopback(*ip)) {
                    return Decision::deny(
                        RejectReason::PrivateOrLoopbackAddress,
                        format!("IP address is private or loopback: {ip}"),
                    );
                }
            }
            Err(e) => {
                tracing::debug!(host = %host, error = %e, "resolution failed, skipping address check");
            }
        }

        Decision::allow()
    }
}

/// Returns true for addresses that must never be fetched from the server.
///
/// Covers RFC 1918 private ranges, loopback, link-local (which includes the
/// 169.254.169.254 metadata service), the unspecified address, IPv6
/// unique-local and link-local ranges, and IPv4-mapped forms of all of these.
pub fn is_private_or_loopback(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_internal_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_internal_v4(v4),
            None => is_internal_v6(v6),
        },
    }
}

fn is_internal_v4(ip: Ipv4Addr) -> bool {
    ip.is_private() || ip.is_loopback() || ip.is_link_local() || ip.is_unspecified()
}

fn is_internal_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link local
        || (first & 0xffc0) == 0xfe80
}
