use crate::config::UploadConfig;
use crate::db::models::{AnalyticsEvent, EventStatus, NewAnalyticsEvent};
use crate::db::repositories::AnalyticsRepository;
use crate::error::Error;
use crate::media::{self, MediaKind, MediaStore};
use anyhow::Result;
use rand::Rng;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

/// Timestamp format stamped into create_date. Reports compare this as a
/// raw string, so it must sort in time order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const MESSAGE_POOL: [&str; 4] = ["Coveralls", "Boots", "Hardhat", "Gloves"];

/// One uploaded binary part
#[derive(Debug, Clone)]
pub struct MediaPayload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Result of a successful ingestion: the stored media paths and record
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    pub log_image: String,
    pub log_video: String,
    pub record: AnalyticsEvent,
}

/// Ingestion service: validates submissions, persists media, synthesizes
/// derived fields and commits the analytics record. Media is always
/// written before the record insert, so a committed record never points
/// at files that were never placed.
pub struct IngestionService {
    analytics: AnalyticsRepository,
    media: MediaStore,
    config: UploadConfig,
}

impl IngestionService {
    pub fn new(pool: Arc<PgPool>, config: UploadConfig) -> Self {
        Self {
            analytics: AnalyticsRepository::new(pool),
            media: MediaStore::new(config.root.clone()),
            config,
        }
    }

    /// Ingest a direct upload: image + video payloads plus optional
    /// action label and user id.
    pub async fn ingest_upload(
        &self,
        image: Option<MediaPayload>,
        video: Option<MediaPayload>,
        action_text: Option<String>,
        user_id: Option<String>,
    ) -> Result<IngestReceipt> {
        let (image, video) = match (image, video) {
            (Some(i), Some(v)) => (i, v),
            _ => {
                return Err(
                    Error::Validation("Image or video file not provided".to_string()).into(),
                )
            }
        };

        if image.filename.is_empty() || video.filename.is_empty() {
            return Err(Error::Validation("No selected files".to_string()).into());
        }

        for payload in [&image, &video] {
            if !self.config.extension_allowed(&payload.filename) {
                return Err(Error::Validation(format!(
                    "File type not allowed: {}",
                    payload.filename
                ))
                .into());
            }
        }

        let log_image = self
            .media
            .place(MediaKind::Image, &image.filename, &image.bytes)
            .await?;
        let log_video = self
            .media
            .place(MediaKind::Video, &video.filename, &video.bytes)
            .await?;

        let record = self
            .commit_record(
                log_image,
                log_video,
                action_text.unwrap_or_else(|| "Default Action".to_string()),
                user_id.unwrap_or_else(|| "default_user".to_string()),
                "Location A",
                EventStatus::ActionReceived,
            )
            .await?;

        info!("Ingested upload as analytics record {}", record.analytics_id);

        Ok(IngestReceipt {
            log_image: record.log_image.clone(),
            log_video: record.log_video.clone(),
            record,
        })
    }

    /// Synthetic/seed ingestion: one random existing file per kind from
    /// the configured seed directories.
    pub async fn ingest_synthetic(&self, user_id: Option<String>) -> Result<IngestReceipt> {
        let log_image = media::pick_random(&self.config.seed_image_dir)
            .await
            .map_err(|_| Error::NotFound("Files not uploaded".to_string()))?;
        let log_video = media::pick_random(&self.config.seed_video_dir)
            .await
            .map_err(|_| Error::NotFound("Files not uploaded".to_string()))?;

        let record = self
            .commit_record(
                log_image,
                log_video,
                "New Action".to_string(),
                user_id.unwrap_or_else(|| "testuser_02".to_string()),
                "Location B",
                EventStatus::Active,
            )
            .await?;

        info!(
            "Inserted synthetic analytics record {}",
            record.analytics_id
        );

        Ok(IngestReceipt {
            log_image: record.log_image.clone(),
            log_video: record.log_video.clone(),
            record,
        })
    }

    /// Handle a generic single-file upload into the store root
    pub async fn upload_file(&self, payload: MediaPayload) -> Result<String> {
        if payload.filename.is_empty() {
            return Err(Error::Validation("No selected file".to_string()).into());
        }

        if !self.config.extension_allowed(&payload.filename) {
            return Err(Error::Validation("File type not allowed".to_string()).into());
        }

        self.media
            .place_at_root(&payload.filename, &payload.bytes)
            .await
    }

    async fn commit_record(
        &self,
        log_image: String,
        log_video: String,
        action: String,
        user_id: String,
        camera_location: &str,
        status: EventStatus,
    ) -> Result<AnalyticsEvent> {
        let event = NewAnalyticsEvent {
            user_id,
            log_image,
            log_video,
            create_date: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            message: random_message(),
            camera_id: random_camera(),
            camera_location: camera_location.to_string(),
            action,
            status: status.as_str().to_string(),
        };

        self.analytics.create(&event).await
    }
}

/// Pick a message from the fixed seed vocabulary
pub fn random_message() -> String {
    MESSAGE_POOL[rand::thread_rng().gen_range(0..MESSAGE_POOL.len())].to_string()
}

/// Pick a camera id from the fixed pool of six
pub fn random_camera() -> String {
    format!("Camera{}", rand::thread_rng().gen_range(1..=6))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_pools_stay_within_the_fixed_vocabulary() {
        for _ in 0..100 {
            assert!(MESSAGE_POOL.contains(&random_message().as_str()));

            let camera = random_camera();
            let n: u32 = camera.strip_prefix("Camera").unwrap().parse().unwrap();
            assert!((1..=6).contains(&n));
        }
    }

    #[test]
    fn timestamp_format_sorts_lexicographically() {
        let earlier = chrono::Local::now();
        let later = earlier + chrono::Duration::seconds(61);
        let a = earlier.format(TIMESTAMP_FORMAT).to_string();
        let b = later.format(TIMESTAMP_FORMAT).to_string();
        assert!(a < b);
    }
}
