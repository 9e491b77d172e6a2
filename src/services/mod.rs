pub mod aggregation;
pub mod ingestion;
pub mod query;

pub use aggregation::{AggregationService, DashboardSummary};
pub use ingestion::{IngestReceipt, IngestionService, MediaPayload};
pub use query::QueryService;
