//! Service layer for visit enrichment
//!
//! This module provides the two enrichment capabilities consumed by the
//! beacon handler: UserAgent classification and GeoIP resolution.

pub mod geoip;
pub mod user_agent;

pub use geoip::{GeoInfo, GeoIpLookup, GeoIpProvider};
pub use user_agent::{DeviceClass, UserAgentInfo, classify};
