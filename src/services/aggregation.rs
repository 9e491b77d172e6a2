use crate::db::repositories::{AnalyticsRepository, CamerasRepository};
use crate::error::Error;
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Dashboard counters
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DashboardSummary {
    pub analytics_id_count: i64,
    pub positive_status_count: i64,
    pub negative_status_count: i64,
    pub camera_count: i64,
}

/// Aggregation service: dashboard counters over the analytics table plus
/// the camera collaborator count.
pub struct AggregationService {
    analytics: AnalyticsRepository,
    cameras: CamerasRepository,
}

impl AggregationService {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            analytics: AnalyticsRepository::new(pool.clone()),
            cameras: CamerasRepository::new(pool),
        }
    }

    /// Compute the dashboard counters. Both dates must parse as
    /// `YYYY-MM-DD`; the counts themselves are store-wide and do not
    /// apply the range (observed upstream behavior, deliberately kept).
    pub async fn summarize(&self, start_date: &str, end_date: &str) -> Result<DashboardSummary> {
        parse_summary_date(start_date)?;
        parse_summary_date(end_date)?;

        let analytics_id_count = self.analytics.count_all().await?;
        let positive_status_count = self.analytics.count_by_status("true").await?;
        let negative_status_count = self.analytics.count_by_status("false").await?;
        let camera_count = self.cameras.count_all().await?;

        Ok(DashboardSummary {
            analytics_id_count,
            positive_status_count,
            negative_status_count,
            camera_count,
        })
    }
}

/// Validate a dashboard date argument
pub fn parse_summary_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| Error::Validation(format!("Invalid date format: {}", value)).into())
}
