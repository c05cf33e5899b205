//! Template helpers for tenant-aware rendering.
//!
//! # Responsibilities
//! - Expose `tenant_url` to templates, mirroring the view-side helper
//! - Expose the route predicates (`es_reporte`, `es_url_con_parametros`)
//! - Expose the `has_group` membership test for menu filtering
//!
//! # Design Decisions
//! - `tenant_url` reads `TENANT_PREFIX` from the render data; when it is
//!   absent the helper degrades to plain reversal, so templates rendered
//!   outside a request lifecycle still work
//! - The helpers share the `UrlBuilder` with handler code, so the tag and
//!   the view-side call cannot drift apart
//! - Reversal failures abort the render; a broken link name is a
//!   programming error, not something to paper over

use handlebars::{
    handlebars_helper, Context, Handlebars, Helper, HelperDef, HelperResult, Output,
    RenderContext, RenderError, RenderErrorReason, ScopedJson,
};
use serde_json::Value as Json;

use crate::tenancy::prefix::TenantPrefix;
use crate::urls::builder::UrlBuilder;

/// Render-data key carrying the current tenant prefix.
pub const TENANT_PREFIX_KEY: &str = "TENANT_PREFIX";

/// `{{tenant_url "core:paciente_detail" pk=42}}`
///
/// First parameter is the symbolic name; remaining positional parameters
/// and hash entries become reversal arguments.
pub struct TenantUrlHelper {
    builder: UrlBuilder,
}

impl TenantUrlHelper {
    pub fn new(builder: UrlBuilder) -> Self {
        Self { builder }
    }
}

impl HelperDef for TenantUrlHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let name = h
            .param(0)
            .and_then(|p| p.value().as_str())
            .ok_or(RenderErrorReason::ParamNotFoundForIndex("tenant_url", 0))?;

        let args: Vec<String> = h
            .params()
            .iter()
            .skip(1)
            .map(|p| json_to_argument(p.value()))
            .collect();
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

        let kwargs: Vec<(&str, String)> = h
            .hash()
            .iter()
            .map(|(key, value)| (*key, json_to_argument(value.value())))
            .collect();
        let kwarg_refs: Vec<(&str, &str)> = kwargs
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .collect();

        let prefix = prefix_from_data(ctx.data());
        let path = self
            .builder
            .tenant_reverse(&prefix, name, &arg_refs, &kwarg_refs)
            .map_err(|e| RenderErrorReason::Other(e.to_string()))?;
        out.write(&path)?;
        Ok(())
    }
}

/// `(es_reporte name)` — true when the name uses the report prefix.
pub struct EsReporteHelper {
    builder: UrlBuilder,
}

impl EsReporteHelper {
    pub fn new(builder: UrlBuilder) -> Self {
        Self { builder }
    }
}

impl HelperDef for EsReporteHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let name = h.param(0).and_then(|p| p.value().as_str()).unwrap_or_default();
        Ok(ScopedJson::Derived(Json::Bool(
            self.builder.table().is_report(name),
        )))
    }
}

/// `(es_url_con_parametros name)` — true when the route takes parameters.
pub struct EsUrlConParametrosHelper {
    builder: UrlBuilder,
}

impl EsUrlConParametrosHelper {
    pub fn new(builder: UrlBuilder) -> Self {
        Self { builder }
    }
}

impl HelperDef for EsUrlConParametrosHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let name = h.param(0).and_then(|p| p.value().as_str()).unwrap_or_default();
        Ok(ScopedJson::Derived(Json::Bool(
            self.builder.table().requires_parameters(name),
        )))
    }
}

handlebars_helper!(HasGroupHelper: |user: Json, names: str| {
    let member_of: Vec<&str> = user
        .get("groups")
        .and_then(Json::as_array)
        .map(|groups| groups.iter().filter_map(Json::as_str).collect())
        .unwrap_or_default();
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .any(|name| member_of.contains(&name))
});

/// Register every helper on a fresh registry.
pub fn register_helpers(registry: &mut Handlebars<'_>, builder: &UrlBuilder) {
    registry.register_helper("tenant_url", Box::new(TenantUrlHelper::new(builder.clone())));
    registry.register_helper("es_reporte", Box::new(EsReporteHelper::new(builder.clone())));
    registry.register_helper(
        "es_url_con_parametros",
        Box::new(EsUrlConParametrosHelper::new(builder.clone())),
    );
    registry.register_helper("has_group", Box::new(HasGroupHelper));
}

/// Read the prefix injected by the context layer, empty when absent.
fn prefix_from_data(data: &Json) -> TenantPrefix {
    data.get(TENANT_PREFIX_KEY)
        .and_then(Json::as_str)
        .and_then(TenantPrefix::parse)
        .unwrap_or_else(TenantPrefix::empty)
}

/// Stringify a helper argument the way it will appear in the path.
fn json_to_argument(value: &Json) -> String {
    match value.as_str() {
        Some(text) => text.to_string(),
        None => value.to_string(),
    }
}
