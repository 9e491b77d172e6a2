pub mod analytics;
pub mod cameras;

pub use analytics::{AnalyticsRepository, SearchFilters};
pub use cameras::CamerasRepository;
