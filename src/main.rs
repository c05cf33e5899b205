//! Tenant Gate (v1)
//!
//! Tenant-aware request routing and URL reversal for the clinic platform,
//! built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!                      │                  TENANT GATE                  │
//!                      │                                               │
//!  Client Request      │  ┌──────────┐   ┌──────────┐   ┌───────────┐  │
//!  ────────────────────┼─▶│ tenancy  │──▶│   http   │──▶│ pages +   │  │
//!                      │  │annotator │   │  router  │   │ diag      │  │
//!                      │  └────┬─────┘   └──────────┘   └─────┬─────┘  │
//!                      │       │                              │        │
//!                      │       ▼                              ▼        │
//!                      │  ┌──────────┐                  ┌───────────┐  │
//!                      │  │ resolver │                  │ urls +    │  │
//!                      │  │ registry │                  │ render    │  │
//!                      │  └──────────┘                  └───────────┘  │
//!                      │                                               │
//!                      │  ┌─────────────────────────────────────────┐  │
//!                      │  │          Cross-Cutting Concerns         │  │
//!                      │  │  config + hot reload · observability ·  │  │
//!                      │  │  lifecycle (signals, shutdown)          │  │
//!                      │  └─────────────────────────────────────────┘  │
//!                      └───────────────────────────────────────────────┘
//! ```
//!
//! # What the binary does
//!
//! - Loads and validates the TOML deployment configuration
//! - Resolves a tenant per request (path, subdomain or header policy)
//! - Strips the tenant prefix before routing, restores it in generated URLs
//! - Serves the demo clinic pages and the operator diagnostics
//! - Hot-reloads tenants and settings when the config file changes

// Core subsystems
pub mod config;
pub mod http;
pub mod tenancy;
pub mod urls;

// Rendering
pub mod render;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::loader::load_config;
use crate::config::watcher::ConfigWatcher;
use crate::config::GateConfig;
use crate::http::GateServer;
use crate::lifecycle::{wait_for_signals, Shutdown};

#[derive(Parser)]
#[command(name = "tenant-gate")]
#[command(about = "Tenant-aware routing gate for the clinic platform", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config/tenant-gate.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // A missing file falls back to defaults so a bare checkout still runs;
    // a file that exists but fails to load or validate is fatal.
    let config = if cli.config.exists() {
        load_config(&cli.config)?
    } else {
        GateConfig::default()
    };

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "tenant_gate={},tower_http=info",
                    config.observability.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("tenant-gate v0.1.0 starting");
    if !cli.config.exists() {
        tracing::warn!(path = ?cli.config, "Config file not found, running with defaults");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        policy = ?config.resolution.policy,
        tenants = config.tenants.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Initialize metrics exporter
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            crate::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Watch the config file; a watcher that fails to start only disables
    // hot reload.
    let (watcher, config_updates) = ConfigWatcher::new(&cli.config);
    let _watcher_guard = match watcher.run() {
        Ok(guard) => Some(guard),
        Err(error) => {
            tracing::warn!(%error, "Config watcher failed to start, hot reload disabled");
            None
        }
    };

    // Translate OS signals into the shutdown broadcast.
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(wait_for_signals(shutdown));

    // Create and run HTTP server
    let server = GateServer::new(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
