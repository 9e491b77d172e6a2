use crate::config::ReportConfig;
use crate::db::models::ReportRow;
use crate::db::repositories::AnalyticsRepository;
use crate::error::Error;
use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

pub mod renderer;

/// Report service: extracts records in a create_date range and renders
/// them either as a lightweight listing or a paginated document on disk.
pub struct ReportService {
    analytics: AnalyticsRepository,
    config: ReportConfig,
}

impl ReportService {
    pub fn new(pool: Arc<PgPool>, config: ReportConfig) -> Self {
        Self {
            analytics: AnalyticsRepository::new(pool),
            config,
        }
    }

    /// Listing form: `{id, message, create_date}` per matching record.
    /// The range is an inclusive raw-string comparison over the stored
    /// timestamp format.
    pub async fn list(&self, start_date: &str, end_date: &str) -> Result<Vec<ReportRow>> {
        self.analytics.report_rows(start_date, end_date).await
    }

    /// Document form: render the matching records into a paginated
    /// tabular document in the output directory and return its path.
    pub async fn generate(&self, start_date: &str, end_date: &str) -> Result<String> {
        let records = self
            .analytics
            .get_by_date_range(start_date, end_date)
            .await?;

        let now = chrono::Local::now();
        let generated_on = now.format("%Y-%m-%d %H:%M:%S").to_string();
        let document =
            renderer::render(&records, start_date, end_date, &generated_on).into_text();

        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(|e| Error::Io(format!("Failed to create report directory: {}", e)))?;

        // timestamped name so repeated calls never collide
        let filename = format!("analytics_report_{}.txt", now.format("%Y%m%d_%H%M%S"));
        let path = self.config.output_dir.join(filename);

        tokio::fs::write(&path, document)
            .await
            .map_err(|e| Error::Io(format!("Failed to write report document: {}", e)))?;

        info!("Generated report: {}", path.display());

        Ok(path.to_string_lossy().replace('\\', "/"))
    }
}
