//! Client address resolution.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Resolve the client address for a request.
///
/// Behind a trusted proxy the first `X-Forwarded-For` hop wins; otherwise,
/// or when the header is absent or unparseable, the socket peer is used.
pub fn client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_proxy: bool,
) -> Option<IpAddr> {
    let forwarded = trust_proxy
        .then(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .map(|h| h.split_once(',').map_or(h, |(ip, _)| ip).trim())
                .and_then(|h| h.parse::<IpAddr>().ok())
        })
        .flatten();

    forwarded.or_else(|| peer.map(|addr| addr.ip()))
}
