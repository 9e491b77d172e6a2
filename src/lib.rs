pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod media;
pub mod report;
pub mod services;

// Re-export main components for easier use
pub use error::Error;
pub use media::{MediaKind, MediaStore};
pub use report::ReportService;
pub use services::{AggregationService, IngestionService, QueryService};
