//! Tenancy subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path, headers, query)
//!     → resolver.rs (override → policy → fallback ladder)
//!     → middleware.rs (strip matched prefix, rewrite URI)
//!     → context.rs (TenantContext attached as extension)
//!     → handlers and URL reversal read the context
//!
//! Registry Compilation (at startup and on reload):
//!     TenantConfig[]
//!     → registry.rs (slug and host lookup maps)
//!     → Freeze as immutable TenantRegistry
//! ```
//!
//! # Design Decisions
//! - The registry is compiled once per config load, immutable at runtime
//! - Resolution is total: unknown identifiers mean "no tenant", never an error
//! - Routes are declared tenant-free; the prefix lives only in the context

pub mod context;
pub mod middleware;
pub mod prefix;
pub mod registry;
pub mod resolver;

pub use context::TenantContext;
pub use prefix::TenantPrefix;
pub use registry::{TenantDescriptor, TenantRegistry};
pub use resolver::{Resolution, ResolverChain, TenantResolver};
