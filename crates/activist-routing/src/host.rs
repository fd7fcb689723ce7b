//! Reserved hostnames and hostname normalization

use serde::{Deserialize, Serialize};

/// Hostnames with a fixed meaning, checked before any tenant lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Serves the admin dashboard.
    pub admin_host: String,
    /// Serves the marketing landing page, together with its `www.` alias.
    pub root_host: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            admin_host: "app.activist.com".to_string(),
            root_host: "activist.com".to_string(),
        }
    }
}

impl HostConfig {
    pub fn new(admin_host: impl AsRef<str>, root_host: impl AsRef<str>) -> Self {
        Self {
            admin_host: normalize_hostname(admin_host.as_ref()),
            root_host: normalize_hostname(root_host.as_ref()),
        }
    }

    /// `hostname` must already be normalized.
    pub fn is_admin(&self, hostname: &str) -> bool {
        hostname == normalize_hostname(&self.admin_host)
    }

    /// Root host or its `www.` alias. `hostname` must already be normalized.
    pub fn is_root(&self, hostname: &str) -> bool {
        let root = normalize_hostname(&self.root_host);
        hostname == root || hostname.strip_prefix("www.") == Some(root.as_str())
    }
}

/// Lowercase and drop a trailing root dot.
pub fn normalize_hostname(hostname: &str) -> String {
    let trimmed = hostname.trim();
    trimmed
        .strip_suffix('.')
        .unwrap_or(trimmed)
        .to_ascii_lowercase()
}

/// Hostname part of an HTTP authority (`Host` header value), without port.
///
/// Returns `None` for an empty authority.
pub fn hostname_from_authority(authority: &str) -> Option<&str> {
    let authority = authority.trim();
    // Userinfo is never valid in a Host header but may appear in a URI
    let authority = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

    let host = if let Some(rest) = authority.strip_prefix('[') {
        // IPv6 literal
        rest.split_once(']').map_or(rest, |(addr, _)| addr)
    } else {
        authority.split_once(':').map_or(authority, |(host, _)| host)
    };

    (!host.is_empty()).then_some(host)
}
