//! Tenant registry: the read-only directory of provisioned clinics.
//!
//! Compiled once from configuration and frozen; resolution never mutates
//! it. Provisioning new tenants is an external concern and arrives here
//! only through a config reload.

use std::collections::HashMap;

use crate::config::schema::TenantConfig;

/// One logical customer of the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantDescriptor {
    /// URL-safe identifier embedded in request paths and headers.
    pub slug: String,
    /// Display name shown to operators and in rendered pages.
    pub nombre: String,
    /// Host serving this tenant under the subdomain policy.
    pub host: Option<String>,
}

/// Immutable lookup maps over the provisioned tenants.
#[derive(Debug, Default)]
pub struct TenantRegistry {
    by_slug: HashMap<String, TenantDescriptor>,
    by_host: HashMap<String, TenantDescriptor>,
}

impl TenantRegistry {
    /// Compile the registry from validated configuration.
    pub fn from_config(tenants: &[TenantConfig]) -> Self {
        let mut by_slug = HashMap::new();
        let mut by_host = HashMap::new();
        for tenant in tenants {
            let descriptor = TenantDescriptor {
                slug: tenant.slug.clone(),
                nombre: tenant.nombre.clone(),
                host: tenant.host.clone(),
            };
            if let Some(host) = &tenant.host {
                by_host.insert(canonical_host(host), descriptor.clone());
            }
            by_slug.insert(tenant.slug.clone(), descriptor);
        }
        Self { by_slug, by_host }
    }

    /// Look a tenant up by its URL slug.
    pub fn by_slug(&self, slug: &str) -> Option<&TenantDescriptor> {
        self.by_slug.get(slug)
    }

    /// Look a tenant up by the request's Host header value.
    /// Comparison is case-insensitive and ignores the port.
    pub fn by_host(&self, host: &str) -> Option<&TenantDescriptor> {
        self.by_host.get(&canonical_host(host))
    }

    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }
}

/// Lowercase a Host header value and drop a trailing `:port`.
fn canonical_host(raw: &str) -> String {
    let lower = raw.trim().to_ascii_lowercase();
    match lower.rsplit_once(':') {
        Some((host, port))
            if !host.is_empty() && !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) =>
        {
            host.to_string()
        }
        _ => lower,
    }
}
