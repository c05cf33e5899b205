//! Diagnostic endpoints.
//!
//! # Responsibilities
//! - Report the resolver's observed state for the current request
//! - Expose a liveness endpoint for operators and the CLI
//!
//! # Design Decisions
//! - Read-only: the handlers never touch state beyond their own request
//! - The tenant report distinguishes "annotated but unbound" from "never
//!   annotated", which is what operators need when wiring a deployment

use axum::{
    extract::Extension,
    http::Uri,
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;

use crate::http::server::AppState;
use crate::tenancy::context::TenantContext;

/// What the annotator saw for one request.
#[derive(Debug, Serialize)]
pub struct TenantDiagnostics {
    pub has_tenant: bool,
    pub tenant_name: Option<String>,
    pub has_tenant_prefix: bool,
    pub tenant_prefix: Option<String>,
    pub path_info: String,
    pub full_path: String,
}

/// Diagnostic routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/debug/tenant/", any(debug_tenant))
        .route("/health", get(health))
}

/// Method-agnostic tenant report for the current request.
async fn debug_tenant(
    context: Option<Extension<TenantContext>>,
    uri: Uri,
) -> Json<TenantDiagnostics> {
    let path_info = uri.path().to_string();
    let diagnostics = match context {
        Some(Extension(context)) => TenantDiagnostics {
            has_tenant: context.is_bound(),
            tenant_name: context.tenant().map(|t| t.nombre.clone()),
            has_tenant_prefix: true,
            tenant_prefix: Some(context.prefix().as_str().to_string()),
            path_info,
            full_path: context.original_path().to_string(),
        },
        None => TenantDiagnostics {
            has_tenant: false,
            tenant_name: None,
            has_tenant_prefix: false,
            tenant_prefix: None,
            full_path: uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| path_info.clone()),
            path_info,
        },
    };
    Json(diagnostics)
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}
