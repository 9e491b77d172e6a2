use crate::db::models::{Camera, NewCamera};
use crate::error::Error;
use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

/// Cameras repository. The analytics core only needs the count; the rest
/// is the standard entity-store shape the collaborator exposes.
#[derive(Clone)]
pub struct CamerasRepository {
    pool: Arc<PgPool>,
}

impl CamerasRepository {
    /// Create a new cameras repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new camera
    pub async fn create(&self, camera: &NewCamera) -> Result<Camera> {
        info!("Creating new camera: {}", camera.camera_url);

        let result = sqlx::query_as::<_, Camera>(
            r#"
            INSERT INTO cameras (camera_url, camera_location, status)
            VALUES ($1, $2, $3)
            RETURNING camera_id, camera_url, camera_location, status
            "#,
        )
        .bind(&camera.camera_url)
        .bind(&camera.camera_location)
        .bind(&camera.status)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create camera: {}", e)))?;

        Ok(result)
    }

    /// Get all cameras
    pub async fn get_all(&self) -> Result<Vec<Camera>> {
        let result = sqlx::query_as::<_, Camera>(
            "SELECT camera_id, camera_url, camera_location, status FROM cameras \
             ORDER BY camera_id",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get cameras: {}", e)))?;

        Ok(result)
    }

    /// Count of all cameras
    pub async fn count_all(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cameras")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to count cameras: {}", e)))?;

        Ok(count)
    }

    /// Delete a camera by ID; returns whether a row was removed
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cameras WHERE camera_id = $1")
            .bind(id)
            .execute(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete camera: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all cameras
    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM cameras")
            .execute(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete cameras: {}", e)))?;

        Ok(result.rows_affected())
    }
}
