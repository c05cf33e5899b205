//! Tenant-aware routing gate for the clinic platform.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod render;
pub mod tenancy;
pub mod urls;

pub use config::schema::GateConfig;
pub use http::GateServer;
pub use lifecycle::Shutdown;
