use crate::db::models::{AnalyticsEvent, NewAnalyticsEvent, ReportRow};
use crate::error::Error;
use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;

/// Optional search filters. Text fields match as case-sensitive
/// substrings; user_id matches exactly.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub message: Option<String>,
    pub camera_id: Option<String>,
    pub action: Option<String>,
    pub status: Option<String>,
    pub user_id: Option<String>,
}

const EVENT_COLUMNS: &str = "analytics_id, user_id, log_image, log_video, create_date, \
     message, camera_id, camera_location, action, status";

/// Analytics repository for handling event record operations
#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: Arc<PgPool>,
}

impl AnalyticsRepository {
    /// Create a new analytics repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Insert a new event record
    pub async fn create(&self, event: &NewAnalyticsEvent) -> Result<AnalyticsEvent> {
        let result = sqlx::query_as::<_, AnalyticsEvent>(&format!(
            r#"
            INSERT INTO analytics (
                user_id, log_image, log_video, create_date, message,
                camera_id, camera_location, action, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(&event.user_id)
        .bind(&event.log_image)
        .bind(&event.log_video)
        .bind(&event.create_date)
        .bind(&event.message)
        .bind(&event.camera_id)
        .bind(&event.camera_location)
        .bind(&event.action)
        .bind(&event.status)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create analytics record: {}", e)))?;

        Ok(result)
    }

    /// Get a record by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<AnalyticsEvent>> {
        let result = sqlx::query_as::<_, AnalyticsEvent>(&format!(
            "SELECT {} FROM analytics WHERE analytics_id = $1",
            EVENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get analytics record by ID: {}", e)))?;

        Ok(result)
    }

    /// Search records with combined optional filters
    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<AnalyticsEvent>> {
        let mut sql = format!("SELECT {} FROM analytics WHERE 1=1", EVENT_COLUMNS);

        let mut params = vec![];
        let mut param_index = 1;

        if let Some(message) = &filters.message {
            sql.push_str(&format!(" AND message LIKE ${}", param_index));
            params.push(format!("%{}%", message));
            param_index += 1;
        }

        if let Some(camera_id) = &filters.camera_id {
            sql.push_str(&format!(" AND camera_id LIKE ${}", param_index));
            params.push(format!("%{}%", camera_id));
            param_index += 1;
        }

        if let Some(action) = &filters.action {
            sql.push_str(&format!(" AND action LIKE ${}", param_index));
            params.push(format!("%{}%", action));
            param_index += 1;
        }

        if let Some(status) = &filters.status {
            sql.push_str(&format!(" AND status LIKE ${}", param_index));
            params.push(format!("%{}%", status));
            param_index += 1;
        }

        if let Some(user_id) = &filters.user_id {
            sql.push_str(&format!(" AND user_id = ${}", param_index));
            params.push(user_id.clone());
        }

        let mut db_query = sqlx::query_as::<_, AnalyticsEvent>(&sql);

        for param in params {
            db_query = db_query.bind(param);
        }

        let result = db_query
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to search analytics records: {}", e)))?;

        Ok(result)
    }

    /// Bounded scan in natural insertion order, optionally narrowed to a
    /// single ID first
    pub async fn list_bounded(
        &self,
        analytics_id: Option<i64>,
        row_count: i64,
    ) -> Result<Vec<AnalyticsEvent>> {
        let result = match analytics_id {
            Some(id) => {
                sqlx::query_as::<_, AnalyticsEvent>(&format!(
                    "SELECT {} FROM analytics WHERE analytics_id = $1 \
                     ORDER BY analytics_id LIMIT $2",
                    EVENT_COLUMNS
                ))
                .bind(id)
                .bind(row_count)
                .fetch_all(&*self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, AnalyticsEvent>(&format!(
                    "SELECT {} FROM analytics ORDER BY analytics_id LIMIT $1",
                    EVENT_COLUMNS
                ))
                .bind(row_count)
                .fetch_all(&*self.pool)
                .await
            }
        }
        .map_err(|e| Error::Database(format!("Failed to list analytics records: {}", e)))?;

        Ok(result)
    }

    /// Full records whose create_date string falls inclusively between the
    /// given bounds. The column is raw text, so the comparison is over the
    /// stored timestamp format as-is.
    pub async fn get_by_date_range(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<AnalyticsEvent>> {
        let result = sqlx::query_as::<_, AnalyticsEvent>(&format!(
            "SELECT {} FROM analytics WHERE create_date BETWEEN $1 AND $2 \
             ORDER BY analytics_id",
            EVENT_COLUMNS
        ))
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get records in date range: {}", e)))?;

        Ok(result)
    }

    /// Report listing projection over the same date range predicate
    pub async fn report_rows(&self, start_date: &str, end_date: &str) -> Result<Vec<ReportRow>> {
        let result = sqlx::query_as::<_, ReportRow>(
            "SELECT analytics_id, message, create_date FROM analytics \
             WHERE create_date BETWEEN $1 AND $2 ORDER BY analytics_id",
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get report rows: {}", e)))?;

        Ok(result)
    }

    /// Count of all records, store-wide
    pub async fn count_all(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analytics")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to count analytics records: {}", e)))?;

        Ok(count)
    }

    /// Count of records whose status column equals the given literal
    pub async fn count_by_status(&self, status: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analytics WHERE status = $1")
            .bind(status)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to count records by status: {}", e)))?;

        Ok(count)
    }

    /// Delete a record by ID; returns whether a row was removed
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM analytics WHERE analytics_id = $1")
            .bind(id)
            .execute(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete analytics record: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all records; returns the number removed
    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM analytics")
            .execute(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete analytics records: {}", e)))?;

        Ok(result.rows_affected())
    }
}
