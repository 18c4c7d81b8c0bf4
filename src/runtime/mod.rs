//! Runtime orchestration
//!
//! Server lifecycle (startup, shutdown) and execution modes.

pub mod lifetime;
pub mod modes;

pub use modes::run_server;
