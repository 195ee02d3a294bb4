//! Host name resolution for probe targets

use crate::{
    error::{AppError, Result},
    models::IpFamily,
};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use trust_dns_resolver::{
    config::{ResolverConfig, ResolverOpts},
    system_conf, TokioAsyncResolver,
};

/// Concrete network address for a probe target, produced once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    /// Address of the requested family
    pub ip: IpAddr,
    /// Host as given by the caller
    pub host_display: String,
    /// Address in display form
    pub addr_display: String,
}

impl ResolvedAddress {
    fn new(ip: IpAddr, host: &str) -> Self {
        Self {
            ip,
            host_display: host.to_string(),
            addr_display: ip.to_string(),
        }
    }
}

/// Resolves a host name or address literal to one address of the requested
/// family
pub struct AddressResolver {
    resolver: TokioAsyncResolver,
}

impl AddressResolver {
    /// Create a resolver from the system DNS configuration
    ///
    /// Falls back to the library's default public configuration when the
    /// system configuration cannot be read.
    pub fn from_system_conf() -> Result<Self> {
        let resolver = match system_conf::read_system_conf() {
            Ok((config, opts)) => TokioAsyncResolver::tokio(config, opts),
            Err(_) => TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default()),
        };

        Ok(Self { resolver })
    }

    /// Resolve `host` to one address of the requested family
    ///
    /// Address literals short-circuit the resolution query. The first
    /// resolved address matching the family wins; a host with no address of
    /// that family fails with `UnknownHost`, never with a wrong-family
    /// address.
    pub async fn resolve(&self, host: &str, family: IpFamily) -> Result<ResolvedAddress> {
        if !family_supported(family) {
            return Err(AppError::unsupported_family(family));
        }

        if let Ok(ip) = host.parse::<IpAddr>() {
            return if matches_family(ip, family) {
                Ok(ResolvedAddress::new(ip, host))
            } else {
                Err(AppError::unknown_host(host, family))
            };
        }

        let lookup = self
            .resolver
            .lookup_ip(host)
            .await
            .map_err(|_| AppError::unknown_host(host, family))?;

        lookup
            .iter()
            .find(|&ip| matches_family(ip, family))
            .map(|ip| ResolvedAddress::new(ip, host))
            .ok_or_else(|| AppError::unknown_host(host, family))
    }
}

fn matches_family(ip: IpAddr, family: IpFamily) -> bool {
    match family {
        IpFamily::V4 => ip.is_ipv4(),
        IpFamily::V6 => ip.is_ipv6(),
    }
}

/// Check whether the local stack can open sockets of the given family
///
/// Binds an ephemeral UDP socket on the unspecified address; nothing is sent.
fn family_supported(family: IpFamily) -> bool {
    let bind_addr = match family {
        IpFamily::V4 => "0.0.0.0:0",
        IpFamily::V6 => "[::]:0",
    };
    std::net::UdpSocket::bind(bind_addr).is_ok()
}
