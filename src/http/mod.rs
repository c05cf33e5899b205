//! HTTP surface of the gate.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → tenancy annotator (outside the Router: annotate, strip prefix)
//!     → server.rs (Router + timeout/trace/request-ID layers)
//!     → pages.rs (rendered clinic pages with tenant-aware links)
//!     → diag.rs (operator endpoints, read-only)
//!     → Response to client
//! ```

pub mod diag;
pub mod pages;
pub mod request;
pub mod server;

pub use request::{RequestId, RequestIdExt, RequestIdLayer, X_REQUEST_ID};
pub use server::{AppState, GateServer, GateState};
