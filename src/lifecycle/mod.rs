//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Compile GateState → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     SIGTERM/SIGINT → broadcast trigger → server drains → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then state, then the listener
//! - One broadcast channel fans the shutdown signal out to all tasks
//! - Config reload is not a lifecycle event; the watcher handles it

pub mod shutdown;

pub use shutdown::{wait_for_signals, Shutdown};
