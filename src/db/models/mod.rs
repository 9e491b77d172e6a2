pub mod analytics_models;
pub mod camera_models;

pub use analytics_models::{AnalyticsEvent, EventStatus, NewAnalyticsEvent, ReportRow};
pub use camera_models::{Camera, NewCamera};
