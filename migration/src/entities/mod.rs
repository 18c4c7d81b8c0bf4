pub mod tracking_log;

pub use tracking_log::Entity as TrackingLogEntity;
