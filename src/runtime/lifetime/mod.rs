//! Lifecycle management
//!
//! Startup preparation and graceful shutdown handling for the server.

pub mod shutdown;
pub mod startup;
