//! Trackpixel - A minimal web analytics beacon service
//!
//! This library provides the core functionality for the Trackpixel service:
//! a tracking pixel endpoint that records enriched visit rows, and a
//! monitoring page that lists them.
//!
//! # Architecture
//! - `analytics`: Visit records and the sink abstraction
//! - `api`: HTTP services and middleware
//! - `config`: Configuration management
//! - `services`: User-Agent classification and GeoIP resolution
//! - `storage`: Storage backends and data access
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging initialization
//! - `utils`: Client IP extraction and HTML escaping

pub mod analytics;
pub mod api;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
