//! Per-client rate limiting using a token bucket.
//!
//! The client key is the peer socket address, or the forwarded client IP
//! (`X-Forwarded-For`, `X-Real-IP`, `Forwarded`) when the service runs behind a
//! trusted reverse proxy.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Token bucket parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    /// Seconds between replenished tokens.
    pub replenish_secs: u64,
    pub burst: u32,
}

/// Public redirect endpoint: burst of 15, one token every 4 seconds.
pub const REDIRECT_QUOTA: Quota = Quota {
    replenish_secs: 4,
    burst: 15,
};

/// Link and key management endpoints: burst of 10, one token per second.
pub const MANAGEMENT_QUOTA: Quota = Quota {
    replenish_secs: 1,
    burst: 10,
};

/// Wraps `router` in a rate limiter with the given quota.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Example
///
/// ```rust,ignore
/// let routes = rate_limit::apply(management_routes(), MANAGEMENT_QUOTA, behind_proxy);
/// ```
pub fn apply<S>(router: Router<S>, quota: Quota, behind_proxy: bool) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if behind_proxy {
        router.layer(forwarded_layer(quota))
    } else {
        router.layer(peer_layer(quota))
    }
}

/// Rate limiter keyed by the socket peer address.
///
/// Requires `ConnectInfo<SocketAddr>` on the request.
pub fn peer_layer(
    quota: Quota,
) -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(quota.replenish_secs)
            .burst_size(quota.burst)
            .finish()
            .expect("rate limit quota is non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Rate limiter keyed by the forwarded client IP, falling back to the peer
/// address.
pub fn forwarded_layer(
    quota: Quota,
) -> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(quota.replenish_secs)
            .burst_size(quota.burst)
            .finish()
            .expect("rate limit quota is non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
