//! URL reversal subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup and on reload):
//!     (name, pattern)[]
//!     → table.rs (compile {param} placeholders)
//!     → Freeze as immutable RouteTable
//!
//! Reversal (per call):
//!     symbolic name + args/kwargs
//!     → table.rs (internal path, tenant-agnostic)
//!     → builder.rs (compose with the request's TenantPrefix)
//!     → FinalPath
//! ```
//!
//! # Design Decisions
//! - One pattern string per route drives both dispatch and reversal
//! - Reversal is tenant-agnostic; all tenant awareness enters in builder.rs
//! - Predicates (`is_report`, `requires_parameters`) are total and cheap

pub mod builder;
pub mod table;

pub use builder::UrlBuilder;
pub use table::{ReverseError, RouteTable, DEFAULT_REPORT_PREFIX};
