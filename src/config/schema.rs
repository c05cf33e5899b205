//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the tenant gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address, connection cap).
    pub listener: ListenerConfig,

    /// Tenant registry entries.
    pub tenants: Vec<TenantConfig>,

    /// Tenant resolution policy and its knobs.
    pub resolution: ResolutionConfig,

    /// URL reversal settings.
    pub urls: UrlConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// One tenant registry entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TenantConfig {
    /// URL-safe identifier, used as the path segment (e.g., "acme").
    pub slug: String,

    /// Display name shown in page chrome and diagnostics.
    pub nombre: String,

    /// Host that identifies this tenant under the subdomain policy.
    #[serde(default)]
    pub host: Option<String>,
}

/// How a request is mapped to a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// First path segment carries the tenant slug (`/acme/...`).
    #[default]
    Path,

    /// Host header maps to a tenant (`acme.clinicas.example`).
    Subdomain,

    /// A request header carries the tenant slug.
    Header,
}

/// Tenant resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Active resolution policy for this deployment.
    pub policy: ResolutionPolicy,

    /// First path segments that can never be tenant slugs.
    pub reserved_segments: Vec<String>,

    /// Honor a `?tenant=slug` override before the policy runs.
    pub allow_query_override: bool,

    /// Slug to fall back to when nothing matches. None means no fallback.
    pub fallback_tenant: Option<String>,

    /// Header consulted by the header policy.
    pub header_name: String,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            policy: ResolutionPolicy::default(),
            reserved_segments: default_reserved_segments(),
            allow_query_override: false,
            fallback_tenant: None,
            header_name: "x-tenant".to_string(),
        }
    }
}

fn default_reserved_segments() -> Vec<String> {
    [
        "admin", "accounts", "api", "static", "media", "debug", "health", "metrics", "setup",
        "tenants", "switch",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// URL reversal configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UrlConfig {
    /// Symbolic-name prefix that marks report routes.
    pub report_prefix: String,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            report_prefix: "core:reporte_".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
