use serde::{Deserialize, Serialize};

/// Camera model (external collaborator entity; the core only counts these)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Camera {
    pub camera_id: i64,
    pub camera_url: String,
    pub camera_location: String,
    pub status: String,
}

/// Insert payload for a camera
#[derive(Debug, Clone, Deserialize)]
pub struct NewCamera {
    pub camera_url: String,
    #[serde(default)]
    pub camera_location: String,
    pub status: String,
}
