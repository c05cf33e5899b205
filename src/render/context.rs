//! Render-data assembly.
//!
//! # Responsibilities
//! - Inject the `TENANT_PREFIX` variable into every page's render data
//! - Surface the tenant's display name for page chrome
//!
//! # Design Decisions
//! - Injection is a pure function of the request annotation; templates
//!   rendered without one simply see an empty prefix

use serde_json::Value as Json;

use crate::render::helpers::TENANT_PREFIX_KEY;
use crate::tenancy::context::TenantContext;

/// Render-data key carrying the tenant's display name.
pub const TENANT_NAME_KEY: &str = "tenant_nombre";

/// Add the tenant bindings to a page's render data.
///
/// Non-object data is returned untouched; the templates always render
/// from an object root.
pub fn with_tenant(mut data: Json, context: &TenantContext) -> Json {
    if let Some(map) = data.as_object_mut() {
        map.insert(
            TENANT_PREFIX_KEY.to_string(),
            Json::String(context.prefix().as_str().to_string()),
        );
        if let Some(tenant) = context.tenant() {
            map.insert(TENANT_NAME_KEY.to_string(), Json::String(tenant.nombre.clone()));
        }
    }
    data
}
