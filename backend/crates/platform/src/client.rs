//! Client identification utilities
//!
//! Extracts diagnostic device metadata from HTTP headers. This metadata is
//! stored alongside sessions for self-service review; it is NOT a security
//! boundary and is never used to accept or reject a request.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

/// Maximum stored User-Agent length. Longer values are truncated.
const USER_AGENT_MAX_LENGTH: usize = 512;

/// Device metadata attached to a session for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct DeviceMeta {
    /// User-Agent string, truncated to a sane length
    pub user_agent: Option<String>,
    /// Client IP address (from X-Forwarded-For or direct connection)
    pub ip: Option<IpAddr>,
}

impl DeviceMeta {
    /// Get IP as string (for database storage)
    pub fn ip_string(&self) -> Option<String> {
        self.ip.map(|ip| ip.to_string())
    }
}

/// Extract device metadata from request headers.
///
/// A missing User-Agent is not an error; both fields are optional.
pub fn extract_device_meta(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> DeviceMeta {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|ua| {
            let mut ua = ua.to_string();
            if ua.len() > USER_AGENT_MAX_LENGTH {
                ua.truncate(USER_AGENT_MAX_LENGTH);
            }
            ua
        });

    DeviceMeta {
        user_agent,
        ip: extract_client_ip(headers, direct_ip),
    }
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    // X-Forwarded-For: first IP in the list is the originating client
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}
