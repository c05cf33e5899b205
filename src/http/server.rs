//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Compile a validated config into one immutable `GateState` generation
//! - Create the Axum Router with all handlers
//! - Wire up middleware (tenant annotation, tracing, timeout, request ID)
//! - Bind the server to a listener and serve until shutdown
//! - Apply config updates by swapping in a new generation
//!
//! # Design Decisions
//! - The tenant annotator wraps the Router from outside; Router layers run
//!   after routing has matched, which would be too late to rewrite the path
//! - Generations are swapped atomically; in-flight requests keep the
//!   snapshot they started with
//! - A config update that fails to compile is rejected, the server keeps
//!   serving the previous generation

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{extract::Request, middleware, Router, ServiceExt};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::Layer;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::schema::GateConfig;
use crate::http::request::RequestIdLayer;
use crate::http::{diag, pages};
use crate::observability::metrics;
use crate::tenancy::middleware::annotate_tenant;
use crate::tenancy::registry::TenantRegistry;
use crate::tenancy::resolver::ResolverChain;
use crate::urls::builder::UrlBuilder;
use crate::urls::table::RouteTable;

/// One compiled configuration generation.
///
/// Everything request handling needs, derived from a validated
/// `GateConfig` and immutable from then on.
pub struct GateState {
    pub config: GateConfig,
    pub registry: Arc<TenantRegistry>,
    pub resolver: ResolverChain,
    pub urls: UrlBuilder,
    pub renderer: handlebars::Handlebars<'static>,
}

impl GateState {
    /// Compile a config into runtime state.
    pub fn from_config(config: GateConfig) -> Result<Self, handlebars::TemplateError> {
        let registry = Arc::new(TenantRegistry::from_config(&config.tenants));
        let resolver = ResolverChain::from_config(&config.resolution, registry.clone());
        let table = Arc::new(RouteTable::from_entries(
            pages::named_routes(),
            config.urls.report_prefix.clone(),
        ));
        let urls = UrlBuilder::new(table);
        let renderer = pages::build_renderer(&urls)?;
        Ok(Self {
            config,
            registry,
            resolver,
            urls,
            renderer,
        })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<GateState>>,
}

impl AppState {
    pub fn new(state: GateState) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(state)),
        }
    }

    /// Current generation. Take one snapshot per request and stick with it.
    pub fn snapshot(&self) -> Arc<GateState> {
        self.inner.load_full()
    }

    /// Swap in a freshly compiled generation.
    pub fn install(&self, state: GateState) {
        self.inner.store(Arc::new(state));
    }
}

/// HTTP server for the tenant gate.
pub struct GateServer {
    state: AppState,
    config: GateConfig,
}

impl GateServer {
    /// Compile the initial state from the given configuration.
    pub fn new(config: GateConfig) -> Result<Self, handlebars::TemplateError> {
        let state = AppState::new(GateState::from_config(config.clone())?);
        Ok(Self { state, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GateConfig, state: AppState) -> Router {
        Router::new()
            .merge(pages::router())
            .merge(diag::router())
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Config updates arriving on `config_updates` are compiled and swapped
    /// in without dropping connections. The server drains and returns when
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GateConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            policy = ?self.config.resolution.policy,
            tenants = self.config.tenants.len(),
            "HTTP server starting"
        );

        // Apply config updates from the watcher while the server runs.
        let reload_state = self.state.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                match GateState::from_config(new_config) {
                    Ok(state) => {
                        let tenants = state.registry.len();
                        reload_state.install(state);
                        metrics::record_reload(true);
                        tracing::info!(tenants, "Configuration reloaded");
                    }
                    Err(error) => {
                        metrics::record_reload(false);
                        tracing::error!(%error, "Rejected config update, keeping current generation");
                    }
                }
            }
        });

        // The annotator wraps the router so the prefix is stripped before
        // route matching sees the path.
        let router = Self::build_router(&self.config, self.state.clone());
        let app = middleware::from_fn_with_state(self.state.clone(), annotate_tenant).layer(router);

        axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TenantConfig;
    use crate::render::helpers::TENANT_PREFIX_KEY;
    use serde_json::json;

    fn config_with_tenants() -> GateConfig {
        let mut config = GateConfig::default();
        config.tenants.push(TenantConfig {
            slug: "acme".into(),
            nombre: "Acme Dental".into(),
            host: Some("acme.clinicas.example".into()),
        });
        config
    }

    #[test]
    fn test_state_compiles_registry_and_routes() {
        let state = GateState::from_config(config_with_tenants()).unwrap();
        assert_eq!(state.registry.len(), 1);
        assert!(state.urls.table().len() >= 7);
        assert!(state.renderer.get_template("index").is_some());
    }

    #[test]
    fn test_install_swaps_generation() {
        let app = AppState::new(GateState::from_config(GateConfig::default()).unwrap());
        assert_eq!(app.snapshot().registry.len(), 0);

        app.install(GateState::from_config(config_with_tenants()).unwrap());
        assert_eq!(app.snapshot().registry.len(), 1);
        assert!(app.snapshot().registry.by_slug("acme").is_some());
    }

    #[test]
    fn test_renderer_uses_configured_report_prefix() {
        let mut config = config_with_tenants();
        config.urls.report_prefix = "informes:".into();
        let state = GateState::from_config(config).unwrap();
        assert!(!state.urls.table().is_report("core:reporte_ingresos"));
        assert!(state.urls.table().is_report("informes:ventas"));
    }

    #[test]
    fn test_snapshot_renders_with_tenant_prefix() {
        let state = GateState::from_config(config_with_tenants()).unwrap();
        let html = state
            .renderer
            .render_template(
                r#"{{tenant_url "core:agenda"}}"#,
                &json!({ TENANT_PREFIX_KEY: "/acme" }),
            )
            .unwrap();
        assert_eq!(html, "/acme/agenda/");
    }
}
