//! Template rendering subsystem.
//!
//! # Data Flow
//! ```text
//! Startup / reload:
//!     templates + helpers → Handlebars registry (frozen per generation)
//!
//! Per render:
//!     handler data
//!     → context.rs (inject TENANT_PREFIX and tenant name)
//!     → registry.render(template, data)
//!     → helpers.rs resolves tenant_url / predicates during the walk
//! ```
//!
//! # Design Decisions
//! - The registry is rebuilt on config reload together with the route
//!   table, so helpers never see a stale UrlBuilder
//! - Helpers receive the prefix through render data, not globals

pub mod context;
pub mod helpers;

pub use context::with_tenant;
pub use helpers::{register_helpers, TENANT_PREFIX_KEY};
