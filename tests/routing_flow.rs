//! End-to-end tenant routing and URL reversal scenarios.

use serde_json::Value;
use tenant_gate::config::{ResolutionPolicy, TenantConfig};

mod common;

async fn get_json(client: &reqwest::Client, url: String) -> Value {
    let res = client.get(url).send().await.expect("gate unreachable");
    assert!(res.status().is_success(), "unexpected status {}", res.status());
    res.json().await.expect("body is JSON")
}

async fn get_text(client: &reqwest::Client, url: String) -> String {
    let res = client.get(url).send().await.expect("gate unreachable");
    assert!(res.status().is_success(), "unexpected status {}", res.status());
    res.text().await.expect("body is text")
}

#[tokio::test]
async fn test_rendered_pages_carry_the_tenant_prefix() {
    let gate = common::spawn_gate(common::demo_config()).await;
    let client = common::client();

    let index = get_text(&client, gate.url("/acme/")).await;
    assert!(index.contains("Acme Dental"));
    assert!(index.contains(r#"href="/acme/pacientes/""#));
    assert!(index.contains(r#"href="/acme/agenda/""#));

    let pacientes = get_text(&client, gate.url("/acme/pacientes/")).await;
    assert!(pacientes.contains(r#"href="/acme/pacientes/1/""#));
    assert!(pacientes.contains(r#"href="/acme/pacientes/3/""#));
}

#[tokio::test]
async fn test_pages_without_tenant_render_plain_paths() {
    let gate = common::spawn_gate(common::demo_config()).await;
    let client = common::client();

    let index = get_text(&client, gate.url("/")).await;
    assert!(index.contains("Portal de clínicas"));
    assert!(index.contains(r#"href="/pacientes/""#));
    assert!(!index.contains("/acme/"));
}

#[tokio::test]
async fn test_unknown_tenant_path_is_not_found() {
    let gate = common::spawn_gate(common::demo_config()).await;
    let client = common::client();

    let res = client
        .get(gate.url("/otra/pacientes/"))
        .send()
        .await
        .expect("gate unreachable");
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn test_prefix_needs_a_segment_boundary() {
    let mut config = common::demo_config();
    config.tenants.push(TenantConfig {
        slug: "aca".into(),
        nombre: "Clínica Aca".into(),
        host: None,
    });
    let gate = common::spawn_gate(config).await;
    let client = common::client();

    // "/aca" matches "/acabar/..." only as a substring, so no tenant and
    // no stripped route.
    let res = client
        .get(gate.url("/acabar/pacientes/"))
        .send()
        .await
        .expect("gate unreachable");
    assert_eq!(res.status(), 404);

    let index = get_text(&client, gate.url("/aca/")).await;
    assert!(index.contains("Clínica Aca"));
    assert!(index.contains(r#"href="/aca/pacientes/""#));
}

#[tokio::test]
async fn test_diagnostics_report_the_bound_tenant() {
    let gate = common::spawn_gate(common::demo_config()).await;
    let client = common::client();

    let json = get_json(&client, gate.url("/acme/debug/tenant/")).await;
    assert_eq!(json["has_tenant"], true);
    assert_eq!(json["tenant_name"], "Acme Dental");
    assert_eq!(json["has_tenant_prefix"], true);
    assert_eq!(json["tenant_prefix"], "/acme");
    assert_eq!(json["path_info"], "/debug/tenant/");
    assert_eq!(json["full_path"], "/acme/debug/tenant/");
}

#[tokio::test]
async fn test_diagnostics_preserve_the_query_string() {
    let gate = common::spawn_gate(common::demo_config()).await;
    let client = common::client();

    let json = get_json(&client, gate.url("/acme/debug/tenant/?page=2&q=ana")).await;
    assert_eq!(json["path_info"], "/debug/tenant/");
    assert_eq!(json["full_path"], "/acme/debug/tenant/?page=2&q=ana");
}

#[tokio::test]
async fn test_diagnostics_are_read_only() {
    let gate = common::spawn_gate(common::demo_config()).await;
    let client = common::client();

    let first = get_json(&client, gate.url("/acme/debug/tenant/")).await;
    // Traffic for another tenant in between must not bleed over.
    let other = get_json(&client, gate.url("/belleza/debug/tenant/")).await;
    assert_eq!(other["tenant_name"], "Clínica Dental Belleza");
    let second = get_json(&client, gate.url("/acme/debug/tenant/")).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_redirects_exit_through_tenant_reverse() {
    let gate = common::spawn_gate(common::demo_config()).await;
    let client = common::client();

    let res = client
        .get(gate.url("/acme/citas/nueva/"))
        .send()
        .await
        .expect("gate unreachable");
    assert_eq!(res.status(), 303);
    assert_eq!(res.headers()["location"], "/acme/agenda/");

    // Empty prefix leaves the reversed path untouched.
    let res = client
        .get(gate.url("/citas/nueva/"))
        .send()
        .await
        .expect("gate unreachable");
    assert_eq!(res.status(), 303);
    assert_eq!(res.headers()["location"], "/agenda/");
}

#[tokio::test]
async fn test_menu_respects_groups_and_parameter_predicates() {
    let gate = common::spawn_gate(common::demo_config()).await;
    let client = common::client();

    let index = get_text(&client, gate.url("/acme/")).await;
    // Parameterized routes render as labels, not links.
    assert!(index.contains("<span>Ficha de paciente</span>"));
    // The demo user is a receptionist, so report entries stay hidden.
    assert!(!index.contains("Reporte de ingresos"));
    assert!(index.contains(r#"href="/acme/agenda/""#));
}

#[tokio::test]
async fn test_header_policy_binds_without_a_prefix() {
    let mut config = common::demo_config();
    config.resolution.policy = ResolutionPolicy::Header;
    let gate = common::spawn_gate(config).await;
    let client = common::client();

    let res = client
        .get(gate.url("/debug/tenant/"))
        .header("x-tenant", "acme")
        .send()
        .await
        .expect("gate unreachable");
    let json: Value = res.json().await.expect("body is JSON");
    assert_eq!(json["has_tenant"], true);
    assert_eq!(json["tenant_name"], "Acme Dental");
    assert_eq!(json["tenant_prefix"], "");

    // Bound tenant with an empty prefix: pages show the clinic but link
    // plain paths.
    let index = client
        .get(gate.url("/"))
        .header("x-tenant", "acme")
        .send()
        .await
        .expect("gate unreachable")
        .text()
        .await
        .unwrap();
    assert!(index.contains("Acme Dental"));
    assert!(index.contains(r#"href="/pacientes/""#));
}

#[tokio::test]
async fn test_query_override_beats_the_policy() {
    let mut config = common::demo_config();
    config.resolution.allow_query_override = true;
    let gate = common::spawn_gate(config).await;
    let client = common::client();

    let json = get_json(&client, gate.url("/debug/tenant/?tenant=belleza")).await;
    assert_eq!(json["has_tenant"], true);
    assert_eq!(json["tenant_name"], "Clínica Dental Belleza");
    assert_eq!(json["tenant_prefix"], "");
    assert_eq!(json["full_path"], "/debug/tenant/?tenant=belleza");
}

#[tokio::test]
async fn test_fallback_tenant_catches_unmatched_requests() {
    let mut config = common::demo_config();
    config.resolution.fallback_tenant = Some("acme".into());
    let gate = common::spawn_gate(config).await;
    let client = common::client();

    let json = get_json(&client, gate.url("/debug/tenant/")).await;
    assert_eq!(json["has_tenant"], true);
    assert_eq!(json["tenant_name"], "Acme Dental");
    assert_eq!(json["tenant_prefix"], "");
}

#[tokio::test]
async fn test_health_endpoint_reports_operational() {
    let gate = common::spawn_gate(common::demo_config()).await;
    let client = common::client();

    let json = get_json(&client, gate.url("/health")).await;
    assert_eq!(json["status"], "operational");
}
