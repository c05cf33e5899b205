//! Per-request tenant context.
//!
//! # Responsibilities
//! - Carry the resolution outcome through the request as an extension
//! - Preserve the original request target before any prefix stripping
//!
//! # Design Decisions
//! - One context is attached to every request, matched or not, so handlers
//!   read a single type instead of probing for a missing extension
//! - Constructors enforce the pairing rule: a prefix without a tenant is
//!   meaningless, so `unbound` cannot carry one

use crate::tenancy::prefix::TenantPrefix;
use crate::tenancy::registry::TenantDescriptor;

/// Resolution outcome attached to each request as an extension.
#[derive(Debug, Clone)]
pub struct TenantContext {
    tenant: Option<TenantDescriptor>,
    prefix: TenantPrefix,
    original_path: String,
}

impl TenantContext {
    /// Context for a request that resolved to a tenant.
    pub fn bound(tenant: TenantDescriptor, prefix: TenantPrefix, original_path: impl Into<String>) -> Self {
        Self {
            tenant: Some(tenant),
            prefix,
            original_path: original_path.into(),
        }
    }

    /// Context for a request with no tenant. The prefix is always empty.
    pub fn unbound(original_path: impl Into<String>) -> Self {
        Self {
            tenant: None,
            prefix: TenantPrefix::empty(),
            original_path: original_path.into(),
        }
    }

    pub fn tenant(&self) -> Option<&TenantDescriptor> {
        self.tenant.as_ref()
    }

    pub fn prefix(&self) -> &TenantPrefix {
        &self.prefix
    }

    /// Request target as the client sent it, before prefix stripping.
    /// Includes the query string when one was present.
    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    pub fn is_bound(&self) -> bool {
        self.tenant.is_some()
    }
}
