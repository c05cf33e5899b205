//! Tenant resolution policies.
//!
//! # Responsibilities
//! - Decide, per request, which tenant (if any) the request belongs to
//! - Support the three deployment policies: path, subdomain, header
//! - Apply the override/fallback ladder around the configured policy
//!
//! # Design Decisions
//! - Resolvers read request metadata only; the registry lookup is the sole
//!   collaboration and it is read-only
//! - Resolution is total: every outcome is a `Resolution`, never a panic or
//!   an error, and unknown identifiers quietly resolve to `NoTenant`
//! - The policy object is chosen once at startup and boxed behind the trait

use axum::body::Body;
use axum::http::{header, Request};
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::schema::{ResolutionConfig, ResolutionPolicy};
use crate::tenancy::prefix::{is_valid_slug, TenantPrefix};
use crate::tenancy::registry::{TenantDescriptor, TenantRegistry};

/// Outcome of tenant resolution for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A tenant was identified. `prefix` is non-empty only when a path
    /// segment did the identifying and must later be stripped.
    Match {
        tenant: TenantDescriptor,
        prefix: TenantPrefix,
    },
    /// Nothing matched. Not an error; callers decide what it means.
    NoTenant,
}

/// Trait for deciding which tenant a request belongs to.
pub trait TenantResolver: Send + Sync + std::fmt::Debug {
    /// Resolve the request. Total: must return for any well-formed request.
    fn resolve(&self, req: &Request<Body>) -> Resolution;
}

/// Resolves the tenant from the first path segment (`/acme/pacientes/`).
#[derive(Debug)]
pub struct PathResolver {
    registry: Arc<TenantRegistry>,
    reserved: HashSet<String>,
}

impl PathResolver {
    pub fn new(registry: Arc<TenantRegistry>, reserved: impl IntoIterator<Item = String>) -> Self {
        Self {
            registry,
            reserved: reserved.into_iter().collect(),
        }
    }
}

impl TenantResolver for PathResolver {
    fn resolve(&self, req: &Request<Body>) -> Resolution {
        let Some(segment) = first_segment(req.uri().path()) else {
            return Resolution::NoTenant;
        };
        if self.reserved.contains(segment) || !is_valid_slug(segment) {
            return Resolution::NoTenant;
        }
        let Some(tenant) = self.registry.by_slug(segment) else {
            return Resolution::NoTenant;
        };
        match TenantPrefix::for_slug(segment) {
            Some(prefix) => Resolution::Match {
                tenant: tenant.clone(),
                prefix,
            },
            None => Resolution::NoTenant,
        }
    }
}

/// Resolves the tenant from the Host header (`acme.clinicas.example`).
#[derive(Debug)]
pub struct SubdomainResolver {
    registry: Arc<TenantRegistry>,
}

impl SubdomainResolver {
    pub fn new(registry: Arc<TenantRegistry>) -> Self {
        Self { registry }
    }
}

impl TenantResolver for SubdomainResolver {
    fn resolve(&self, req: &Request<Body>) -> Resolution {
        let host = req
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok());
        match host.and_then(|h| self.registry.by_host(h)) {
            Some(tenant) => Resolution::Match {
                tenant: tenant.clone(),
                prefix: TenantPrefix::empty(),
            },
            None => Resolution::NoTenant,
        }
    }
}

/// Resolves the tenant from a configurable request header.
#[derive(Debug)]
pub struct HeaderResolver {
    registry: Arc<TenantRegistry>,
    header_name: String,
}

impl HeaderResolver {
    pub fn new(registry: Arc<TenantRegistry>, header_name: impl Into<String>) -> Self {
        Self {
            registry,
            header_name: header_name.into(),
        }
    }
}

impl TenantResolver for HeaderResolver {
    fn resolve(&self, req: &Request<Body>) -> Resolution {
        let slug = req
            .headers()
            .get(&self.header_name)
            .and_then(|h| h.to_str().ok())
            .map(str::trim);
        match slug.and_then(|s| self.registry.by_slug(s)) {
            Some(tenant) => Resolution::Match {
                tenant: tenant.clone(),
                prefix: TenantPrefix::empty(),
            },
            None => Resolution::NoTenant,
        }
    }
}

/// The full resolution ladder used by the annotator.
///
/// Priority order: the `?tenant=slug` override (when enabled), then the
/// configured policy, then the configured fallback tenant. The override and
/// the fallback identify a tenant without consuming a path segment, so both
/// leave the prefix empty.
#[derive(Debug)]
pub struct ResolverChain {
    registry: Arc<TenantRegistry>,
    policy: Box<dyn TenantResolver>,
    allow_query_override: bool,
    fallback: Option<TenantDescriptor>,
}

impl ResolverChain {
    /// Select the policy resolver at startup and assemble the ladder.
    pub fn from_config(resolution: &ResolutionConfig, registry: Arc<TenantRegistry>) -> Self {
        let policy: Box<dyn TenantResolver> = match resolution.policy {
            ResolutionPolicy::Path => Box::new(PathResolver::new(
                registry.clone(),
                resolution.reserved_segments.iter().cloned(),
            )),
            ResolutionPolicy::Subdomain => Box::new(SubdomainResolver::new(registry.clone())),
            ResolutionPolicy::Header => Box::new(HeaderResolver::new(
                registry.clone(),
                resolution.header_name.clone(),
            )),
        };
        let fallback = resolution
            .fallback_tenant
            .as_deref()
            .and_then(|slug| registry.by_slug(slug).cloned());
        if resolution.fallback_tenant.is_some() && fallback.is_none() {
            tracing::warn!(
                slug = resolution.fallback_tenant.as_deref().unwrap_or_default(),
                "fallback tenant is not in the registry; ignoring it"
            );
        }
        Self {
            registry,
            policy,
            allow_query_override: resolution.allow_query_override,
            fallback,
        }
    }
}

impl TenantResolver for ResolverChain {
    fn resolve(&self, req: &Request<Body>) -> Resolution {
        if self.allow_query_override {
            let slug = req.uri().query().and_then(|q| query_param(q, "tenant"));
            if let Some(tenant) = slug.and_then(|s| self.registry.by_slug(s)) {
                return Resolution::Match {
                    tenant: tenant.clone(),
                    prefix: TenantPrefix::empty(),
                };
            }
            // An unknown override falls through to the policy.
        }
        match self.policy.resolve(req) {
            matched @ Resolution::Match { .. } => matched,
            Resolution::NoTenant => match &self.fallback {
                Some(tenant) => Resolution::Match {
                    tenant: tenant.clone(),
                    prefix: TenantPrefix::empty(),
                },
                None => Resolution::NoTenant,
            },
        }
    }
}

/// First non-empty path segment, or `None` for the root path.
fn first_segment(path: &str) -> Option<&str> {
    path.trim_start_matches('/')
        .split('/')
        .next()
        .filter(|s| !s.is_empty())
}

/// Value of one query parameter, first occurrence wins.
fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}
