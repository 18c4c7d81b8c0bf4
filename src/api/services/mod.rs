pub mod beacon;
pub mod monitoring;

pub use beacon::{BeaconService, beacon_routes};
pub use monitoring::{MonitoringService, monitoring_routes};
