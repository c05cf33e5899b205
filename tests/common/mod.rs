//! Shared utilities for the gate integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use tenant_gate::config::{GateConfig, TenantConfig};
use tenant_gate::http::GateServer;
use tenant_gate::lifecycle::Shutdown;

/// One gate serving on an ephemeral port, plus the handles to drive it.
pub struct TestGate {
    pub addr: SocketAddr,
    /// Feeds the server's reload loop, the way the config watcher would.
    #[allow(dead_code)]
    pub config_tx: mpsc::UnboundedSender<GateConfig>,
    shutdown: Shutdown,
}

impl TestGate {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGate {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Bind an ephemeral port and serve the given config on it.
pub async fn spawn_gate(config: GateConfig) -> TestGate {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (config_tx, config_updates) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = GateServer::new(config).expect("config compiles into gate state");

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    wait_until_healthy(addr).await;

    TestGate {
        addr,
        config_tx,
        shutdown,
    }
}

/// Two clinics under the default path policy.
pub fn demo_config() -> GateConfig {
    let mut config = GateConfig::default();
    config.tenants.push(TenantConfig {
        slug: "acme".into(),
        nombre: "Acme Dental".into(),
        host: Some("acme.clinicas.example".into()),
    });
    config.tenants.push(TenantConfig {
        slug: "belleza".into(),
        nombre: "Clínica Dental Belleza".into(),
        host: Some("belleza.clinicas.example".into()),
    });
    config
}

/// Non-pooled client with redirects disabled, so Location headers are
/// observable.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Poll the health endpoint until the gate accepts requests.
pub async fn wait_until_healthy(addr: SocketAddr) {
    let client = client();
    for _ in 0..50 {
        if let Ok(res) = client.get(format!("http://{}/health", addr)).send().await {
            if res.status().is_success() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("gate on {} never became healthy", addr);
}
