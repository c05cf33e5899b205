//! Tenant annotation middleware.
//!
//! # Responsibilities
//! - Run the resolver chain on every request before routing
//! - Strip a matched path prefix so routes are declared tenant-free
//! - Attach the `TenantContext` extension for handlers and diagnostics
//! - Record resolution and request metrics
//!
//! # Data Flow
//! ```text
//! Request → resolve (override → policy → fallback)
//!         → matched with a prefix? rewrite URI with the prefix stripped
//!         → insert TenantContext
//!         → inner router → record metrics on the way out
//! ```
//!
//! # Design Decisions
//! - Wraps the Router from outside so the rewritten URI is what gets routed
//! - A failed URI rebuild keeps the original path; the request still carries
//!   a bound context so URL reversal stays tenant-aware

use axum::{
    body::Body,
    extract::State,
    http::{uri::PathAndQuery, Request, Uri},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, warn};

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::tenancy::context::TenantContext;
use crate::tenancy::resolver::{Resolution, TenantResolver};

/// Resolve the tenant for one request and annotate it before routing.
pub async fn annotate_tenant(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Already annotated upstream: keep those bindings. Resolving again
    // after the prefix strip would give a different answer.
    if req.extensions().get::<TenantContext>().is_some() {
        return next.run(req).await;
    }

    let start_time = Instant::now();
    let snapshot = state.snapshot();
    let method = req.method().to_string();

    // 1. Capture the target as the client sent it, query included.
    let original = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    // 2. Resolve the tenant.
    let context = match snapshot.resolver.resolve(&req) {
        Resolution::Match { tenant, prefix } => {
            debug!(
                tenant = %tenant.slug,
                prefix = %prefix,
                path = %original,
                "Tenant resolved"
            );
            // 3. Strip the prefix so the router only sees internal paths.
            if let Some(stripped) = prefix.strip(req.uri().path()) {
                rewrite_path(&mut req, &stripped);
            }
            TenantContext::bound(tenant, prefix, original)
        }
        Resolution::NoTenant => {
            debug!(path = %original, "No tenant resolved");
            TenantContext::unbound(original)
        }
    };

    let outcome = if context.is_bound() { "bound" } else { "unbound" };
    let tenant_slug = context
        .tenant()
        .map(|t| t.slug.clone())
        .unwrap_or_else(|| "none".to_string());
    metrics::record_resolution(outcome);

    // 4. Attach the context and hand over to the router.
    req.extensions_mut().insert(context);
    let response = next.run(req).await;

    metrics::record_request(&method, response.status().as_u16(), &tenant_slug, start_time);
    response
}

/// Replace the request path, keeping the query string intact.
fn rewrite_path(req: &mut Request<Body>, new_path: &str) {
    let target = match req.uri().query() {
        Some(query) => format!("{new_path}?{query}"),
        None => new_path.to_string(),
    };
    let new_pq = match PathAndQuery::try_from(target.as_str()) {
        Ok(pq) => pq,
        Err(error) => {
            warn!(%error, path = %new_path, "Rewrite produced an invalid target, keeping original path");
            return;
        }
    };
    let mut parts = req.uri().clone().into_parts();
    parts.path_and_query = Some(new_pq);
    match Uri::from_parts(parts) {
        Ok(uri) => *req.uri_mut() = uri,
        Err(error) => {
            warn!(%error, path = %new_path, "URI rebuild failed, keeping original path");
        }
    }
}
