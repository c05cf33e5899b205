//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (fallback references a configured tenant)
//! - Validate value ranges (timeouts > 0, slugs well-formed)
//! - Detect conflicting tenants (duplicate slugs and hosts)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use crate::config::schema::{GateConfig, ResolutionPolicy};
use crate::tenancy::prefix::is_valid_slug;

/// One semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyBindAddress,
    ZeroRequestTimeout,
    InvalidSlug(String),
    EmptyNombre(String),
    DuplicateSlug(String),
    DuplicateHost(String),
    ReservedSlug(String),
    UnknownFallbackTenant(String),
    NoHostsForSubdomainPolicy,
    EmptyHeaderName,
    EmptyReportPrefix,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyBindAddress => write!(f, "listener.bind_address is empty"),
            ValidationError::ZeroRequestTimeout => write!(f, "timeouts.request_secs must be > 0"),
            ValidationError::InvalidSlug(slug) => {
                write!(f, "tenant slug '{}' is not a valid slug", slug)
            }
            ValidationError::EmptyNombre(slug) => {
                write!(f, "tenant '{}' has an empty display name", slug)
            }
            ValidationError::DuplicateSlug(slug) => {
                write!(f, "tenant slug '{}' is declared more than once", slug)
            }
            ValidationError::DuplicateHost(host) => {
                write!(f, "host '{}' is assigned to more than one tenant", host)
            }
            ValidationError::ReservedSlug(slug) => {
                write!(f, "tenant slug '{}' collides with a reserved segment", slug)
            }
            ValidationError::UnknownFallbackTenant(slug) => {
                write!(f, "fallback tenant '{}' is not a configured tenant", slug)
            }
            ValidationError::NoHostsForSubdomainPolicy => {
                write!(f, "subdomain policy requires at least one tenant with a host")
            }
            ValidationError::EmptyHeaderName => {
                write!(f, "header policy requires resolution.header_name")
            }
            ValidationError::EmptyReportPrefix => write!(f, "urls.report_prefix is empty"),
        }
    }
}

/// Check all semantic rules, collecting every violation.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.urls.report_prefix.is_empty() {
        errors.push(ValidationError::EmptyReportPrefix);
    }

    let reserved: HashSet<&str> = config
        .resolution
        .reserved_segments
        .iter()
        .map(String::as_str)
        .collect();

    let mut seen_slugs = HashSet::new();
    let mut seen_hosts = HashSet::new();
    for tenant in &config.tenants {
        if !is_valid_slug(&tenant.slug) {
            errors.push(ValidationError::InvalidSlug(tenant.slug.clone()));
        }
        if tenant.nombre.trim().is_empty() {
            errors.push(ValidationError::EmptyNombre(tenant.slug.clone()));
        }
        if reserved.contains(tenant.slug.as_str()) {
            errors.push(ValidationError::ReservedSlug(tenant.slug.clone()));
        }
        if !seen_slugs.insert(tenant.slug.as_str()) {
            errors.push(ValidationError::DuplicateSlug(tenant.slug.clone()));
        }
        if let Some(host) = &tenant.host {
            let host = host.to_lowercase();
            if !seen_hosts.insert(host.clone()) {
                errors.push(ValidationError::DuplicateHost(host));
            }
        }
    }

    if let Some(fallback) = &config.resolution.fallback_tenant {
        if !seen_slugs.contains(fallback.as_str()) {
            errors.push(ValidationError::UnknownFallbackTenant(fallback.clone()));
        }
    }
    match config.resolution.policy {
        ResolutionPolicy::Subdomain => {
            if config.tenants.iter().all(|t| t.host.is_none()) {
                errors.push(ValidationError::NoHostsForSubdomainPolicy);
            }
        }
        ResolutionPolicy::Header => {
            if config.resolution.header_name.trim().is_empty() {
                errors.push(ValidationError::EmptyHeaderName);
            }
        }
        ResolutionPolicy::Path => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
