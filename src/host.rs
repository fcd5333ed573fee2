use std::net::{IpAddr, ToSocketAddrs};

/// Name and address of the machine the process runs on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostIdentity {
    /// Host name as reported by the OS. No reverse lookup is made, so this
    /// is not necessarily the canonical (fully qualified) name.
    pub cname: String,
    pub ip: IpAddr,
}

/// Look up the local host name and the address it resolves to.
///
/// Best effort: an unreadable host name or a failed lookup yields `None`
/// and the host fields are left out of every record.
pub fn resolve() -> Option<HostIdentity> {
    let name = gethostname::gethostname().into_string().ok()?;
    let identity = resolve_name(&name);
    match &identity {
        Some(host) => tracing::debug!(cname = %host.cname, ip = %host.ip, "resolved host identity"),
        None => tracing::debug!(hostname = %name, "host identity unavailable"),
    }
    identity
}

/// Resolve `name` to an identity, preferring an IPv4 address.
pub fn resolve_name(name: &str) -> Option<HostIdentity> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let addrs: Vec<IpAddr> = (name, 0).to_socket_addrs().ok()?.map(|a| a.ip()).collect();
    let ip = addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()?;
    Some(HostIdentity {
        cname: name.to_string(),
        ip,
    })
}
