//! Mode routing
//!
//! The crate runs a single execution mode: the HTTP server.

pub mod server;

pub use server::run_server;
