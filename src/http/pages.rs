//! Clinic page handlers.
//!
//! # Responsibilities
//! - Declare the named route inventory that drives dispatch and reversal
//! - Render the demo clinic pages through the shared Handlebars registry
//! - Demonstrate the view-side `tenant_reverse` on the redirect handler
//!
//! # Design Decisions
//! - Routes are declared once in `named_routes` and registered verbatim on
//!   the Router, so a reversed path always matches a real route
//! - Handlers never see the tenant prefix; links come out tenant-qualified
//!   because rendering injects `TENANT_PREFIX` and templates use
//!   `tenant_url`
//! - Page data is fixed demo content; real clinic data is someone else's
//!   problem

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value as Json};

use crate::http::server::{AppState, GateState};
use crate::render;
use crate::tenancy::context::TenantContext;
use crate::urls::builder::UrlBuilder;

/// Symbolic names and their route patterns, the single source of truth.
pub fn named_routes() -> [(&'static str, &'static str); 8] {
    [
        ("core:index", "/"),
        ("core:paciente_list", "/pacientes/"),
        ("core:paciente_detail", "/pacientes/{pk}/"),
        ("core:agenda", "/agenda/"),
        ("core:cita_create", "/citas/nueva/"),
        ("core:reporte_ingresos", "/reportes/ingresos/"),
        ("core:reporte_saldos", "/reportes/saldos/"),
        ("debug_tenant", "/debug/tenant/"),
    ]
}

/// Page routes, patterns identical to `named_routes`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/pacientes/", get(paciente_list))
        .route("/pacientes/{pk}/", get(paciente_detail))
        .route("/agenda/", get(agenda))
        .route("/citas/nueva/", get(cita_create))
        .route("/reportes/ingresos/", get(reporte_ingresos))
        .route("/reportes/saldos/", get(reporte_saldos))
}

/// Compile the template registry for one config generation.
pub fn build_renderer(
    urls: &UrlBuilder,
) -> Result<handlebars::Handlebars<'static>, handlebars::TemplateError> {
    let mut registry = handlebars::Handlebars::new();
    render::register_helpers(&mut registry, urls);
    registry.register_template_string("index", INDEX_TEMPLATE)?;
    registry.register_template_string("pacientes", PACIENTES_TEMPLATE)?;
    registry.register_template_string("paciente", PACIENTE_TEMPLATE)?;
    registry.register_template_string("agenda", AGENDA_TEMPLATE)?;
    registry.register_template_string("reporte", REPORTE_TEMPLATE)?;
    Ok(registry)
}

async fn index(
    State(state): State<AppState>,
    Extension(context): Extension<TenantContext>,
) -> Response {
    let snapshot = state.snapshot();
    render_page(&snapshot, "index", index_data(), &context)
}

async fn paciente_list(
    State(state): State<AppState>,
    Extension(context): Extension<TenantContext>,
) -> Response {
    let snapshot = state.snapshot();
    let data = json!({ "pacientes": demo_pacientes() });
    render_page(&snapshot, "pacientes", data, &context)
}

async fn paciente_detail(
    State(state): State<AppState>,
    Extension(context): Extension<TenantContext>,
    Path(pk): Path<String>,
) -> Response {
    let snapshot = state.snapshot();
    let nombre = demo_pacientes()
        .as_array()
        .and_then(|pacientes| {
            pacientes
                .iter()
                .find(|p| p["id"].to_string() == pk)
                .and_then(|p| p["nombre"].as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("Paciente {pk}"));
    let data = json!({ "pk": pk, "nombre": nombre });
    render_page(&snapshot, "paciente", data, &context)
}

async fn agenda(
    State(state): State<AppState>,
    Extension(context): Extension<TenantContext>,
) -> Response {
    let snapshot = state.snapshot();
    let data = json!({
        "citas": [
            { "hora": "09:00", "paciente": "Ana Pérez" },
            { "hora": "10:30", "paciente": "Luis Romero" },
            { "hora": "12:00", "paciente": "María Solís" },
        ],
    });
    render_page(&snapshot, "agenda", data, &context)
}

/// Placeholder creation flow: bounce straight back to the agenda.
/// Exercises the view-side reverse on a redirect target.
async fn cita_create(
    State(state): State<AppState>,
    Extension(context): Extension<TenantContext>,
) -> Response {
    let snapshot = state.snapshot();
    match snapshot.urls.for_request(&context, "core:agenda", &[], &[]) {
        Ok(target) => Redirect::to(&target).into_response(),
        Err(error) => {
            tracing::error!(%error, "Redirect target failed to reverse");
            (StatusCode::INTERNAL_SERVER_ERROR, "Reverse error").into_response()
        }
    }
}

async fn reporte_ingresos(
    State(state): State<AppState>,
    Extension(context): Extension<TenantContext>,
) -> Response {
    let snapshot = state.snapshot();
    let data = json!({
        "titulo": "Ingresos del mes",
        "filas": [
            { "concepto": "Limpieza dental", "monto": "120.00" },
            { "concepto": "Endodoncia", "monto": "450.00" },
        ],
    });
    render_page(&snapshot, "reporte", data, &context)
}

async fn reporte_saldos(
    State(state): State<AppState>,
    Extension(context): Extension<TenantContext>,
) -> Response {
    let snapshot = state.snapshot();
    let data = json!({
        "titulo": "Saldos pendientes",
        "filas": [
            { "concepto": "Ana Pérez", "monto": "80.00" },
            { "concepto": "Luis Romero", "monto": "0.00" },
        ],
    });
    render_page(&snapshot, "reporte", data, &context)
}

/// Render one page, injecting the tenant bindings into the data.
fn render_page(state: &GateState, template: &str, data: Json, context: &TenantContext) -> Response {
    let data = render::with_tenant(data, context);
    match state.renderer.render(template, &data) {
        Ok(html) => Html(html).into_response(),
        Err(error) => {
            tracing::error!(%error, template, "Template render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Render error").into_response()
        }
    }
}

fn index_data() -> Json {
    json!({
        "user": { "username": "recepcion", "groups": ["Recepcionista"] },
        "menu": [
            {
                "name": "core:paciente_list",
                "label": "Pacientes",
                "allow": "Administrador,Recepcionista",
            },
            {
                "name": "core:agenda",
                "label": "Agenda",
                "allow": "Administrador,Recepcionista,Odontólogo",
            },
            {
                "name": "core:paciente_detail",
                "label": "Ficha de paciente",
                "allow": "Administrador,Recepcionista",
            },
            {
                "name": "core:reporte_ingresos",
                "label": "Reporte de ingresos",
                "allow": "Administrador",
            },
            {
                "name": "core:reporte_saldos",
                "label": "Reporte de saldos",
                "allow": "Administrador",
            },
        ],
    })
}

fn demo_pacientes() -> Json {
    json!([
        { "id": 1, "nombre": "Ana Pérez" },
        { "id": 2, "nombre": "Luis Romero" },
        { "id": 3, "nombre": "María Solís" },
    ])
}

const INDEX_TEMPLATE: &str = r#"<!doctype html>
<html lang="es">
<head><meta charset="utf-8"><title>{{#if tenant_nombre}}{{tenant_nombre}}{{else}}Portal de clínicas{{/if}}</title></head>
<body>
<h1>{{#if tenant_nombre}}{{tenant_nombre}}{{else}}Portal de clínicas{{/if}}</h1>
<nav>
<ul>
{{#each menu}}
{{#if (has_group ../user allow)}}
<li class="{{#if (es_reporte name)}}reporte{{else}}pagina{{/if}}">
{{#if (es_url_con_parametros name)}}
<span>{{label}}</span>
{{else}}
<a href="{{tenant_url name}}">{{label}}</a>
{{/if}}
</li>
{{/if}}
{{/each}}
</ul>
</nav>
</body>
</html>
"#;

const PACIENTES_TEMPLATE: &str = r#"<h1>Pacientes</h1>
<ul>
{{#each pacientes}}
<li><a href="{{tenant_url "core:paciente_detail" pk=id}}">{{nombre}}</a></li>
{{/each}}
</ul>
<p><a href="{{tenant_url "core:index"}}">Inicio</a></p>
"#;

const PACIENTE_TEMPLATE: &str = r#"<h1>{{nombre}}</h1>
<p>Expediente {{pk}}</p>
<p><a href="{{tenant_url "core:paciente_list"}}">Volver a pacientes</a></p>
"#;

const AGENDA_TEMPLATE: &str = r#"<h1>Agenda</h1>
<table>
{{#each citas}}
<tr><td>{{hora}}</td><td>{{paciente}}</td></tr>
{{/each}}
</table>
<p><a href="{{tenant_url "core:cita_create"}}">Nueva cita</a></p>
"#;

const REPORTE_TEMPLATE: &str = r#"<h1>{{titulo}}</h1>
<table>
{{#each filas}}
<tr><td>{{concepto}}</td><td>{{monto}}</td></tr>
{{/each}}
</table>
<p><a href="{{tenant_url "core:index"}}">Inicio</a></p>
"#;
