//! Hostname to route context classification

use activist_core::{TenantConfig, TenantLookup};
use tracing::debug;

use crate::host::{HostConfig, normalize_hostname};

/// What a request is addressed to. Produced fresh per request.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteContext {
    Admin,
    PublicHost,
    Public { tenant: TenantConfig },
    NotFound,
}

impl RouteContext {
    /// Variant name, used for headers, metrics labels and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteContext::Admin => "admin",
            RouteContext::PublicHost => "public-host",
            RouteContext::Public { .. } => "public",
            RouteContext::NotFound => "not-found",
        }
    }

    pub fn tenant(&self) -> Option<&TenantConfig> {
        match self {
            RouteContext::Public { tenant } => Some(tenant),
            _ => None,
        }
    }
}

/// Classifies `(path, hostname)` pairs against the reserved hosts and a
/// tenant lookup.
#[derive(Debug, Clone, Default)]
pub struct DomainResolver {
    hosts: HostConfig,
}

impl DomainResolver {
    pub fn new(hosts: HostConfig) -> Self {
        Self { hosts }
    }

    pub fn hosts(&self) -> &HostConfig {
        &self.hosts
    }

    /// Resolve a request.
    ///
    /// Rules, first match wins:
    /// 1. admin host → `Admin`
    /// 2. root host or `www.` root → `PublicHost`
    /// 3. leftmost label names a tenant → `Public`
    /// 4. otherwise → `NotFound`
    ///
    /// `path` does not affect the result; sub-routing is left to the caller.
    ///
    /// # Examples
    /// ```
    /// use activist_core::seed::default_tenants;
    /// use activist_routing::{DomainResolver, RouteContext};
    ///
    /// let resolver = DomainResolver::default();
    /// let tenants = default_tenants();
    ///
    /// assert_eq!(resolver.resolve("/", "app.activist.com", &tenants), RouteContext::Admin);
    /// assert_eq!(
    ///     resolver.resolve("/", "unknown.activist.com", &tenants),
    ///     RouteContext::NotFound
    /// );
    /// ```
    pub fn resolve<L>(&self, path: &str, hostname: &str, tenants: &L) -> RouteContext
    where
        L: TenantLookup + ?Sized,
    {
        let hostname = normalize_hostname(hostname);

        let context = if hostname.is_empty() {
            RouteContext::NotFound
        } else if self.hosts.is_admin(&hostname) {
            RouteContext::Admin
        } else if self.hosts.is_root(&hostname) {
            RouteContext::PublicHost
        } else {
            let candidate = hostname.split('.').next().unwrap_or_default();
            match tenants.get_by_slug(candidate) {
                Some(tenant) => RouteContext::Public {
                    tenant: tenant.clone(),
                },
                None => RouteContext::NotFound,
            }
        };

        debug!(
            "Resolved host '{}' path '{}' to {}",
            hostname,
            path,
            context.as_str()
        );
        context
    }
}
