//! Caller identification

use std::net::{IpAddr, SocketAddr};

/// Reported when no address can be determined
pub const UNKNOWN_IP: &str = "unknown";

/// Address of the caller.
///
/// With `trust_proxy`, the left-most parseable entry of `X-Forwarded-For`
/// wins (the original client as seen by the first proxy). Otherwise, or
/// when the header carries nothing usable, the peer address is used.
#[must_use]
pub fn client_ip(remote: Option<SocketAddr>, forwarded_for: Option<&str>, trust_proxy: bool) -> String {
    let forwarded = forwarded_for
        .filter(|_| trust_proxy)
        .and_then(|header| header.split(',').find_map(parse_forwarded_entry));

    forwarded
        .or_else(|| remote.map(|addr| addr.ip()))
        .map_or_else(|| UNKNOWN_IP.to_string(), |ip| ip.to_canonical().to_string())
}

fn parse_forwarded_entry(entry: &str) -> Option<IpAddr> {
    let entry = entry.trim();
    entry
        .parse::<IpAddr>()
        .ok()
        .or_else(|| entry.parse::<SocketAddr>().ok().map(|addr| addr.ip()))
}
